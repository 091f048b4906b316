use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::ops;

/// `Fraction` over arbitrary-precision integers, for when `i64` numerators
/// and denominators would overflow. Same canonical-form invariant: positive
/// denominator, no common factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigFraction {
    num: BigInt,
    den: BigInt,
}

impl BigFraction {
    pub fn new(num: BigInt, den: BigInt) -> Self {
        if den.is_zero() {
            panic!("Denominator cannot be zero");
        }

        let g = num.gcd(&den);
        let num = num / &g;
        let den = den / &g;

        if den < BigInt::zero() {
            return Self {
                num: -num,
                den: -den,
            };
        }
        Self { num, den }
    }

    pub fn from_integers(num: i64, den: i64) -> Self {
        BigFraction::new(BigInt::from(num), BigInt::from(den))
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        let mut nums = s.split('/');
        let num = nums.next().ok_or("No number")?;
        let den = nums.next().unwrap_or("1");

        let num = BigInt::parse_bytes(num.trim().as_bytes(), 10).ok_or("Invalid number")?;
        let den = BigInt::parse_bytes(den.trim().as_bytes(), 10).ok_or("Invalid number")?;
        if den.is_zero() {
            return Err("Denominator cannot be zero".into());
        }
        Ok(BigFraction::new(num, den))
    }

    pub fn numerator(&self) -> &BigInt {
        &self.num
    }

    pub fn denominator(&self) -> &BigInt {
        &self.den
    }

    pub fn fractional_part(&self) -> BigFraction {
        BigFraction::new(&self.num % &self.den, self.den.clone())
    }

    pub fn whole_part(&self) -> BigInt {
        &self.num / &self.den
    }

    pub fn to_whole_number(&self) -> Result<BigInt, String> {
        if !self.den.is_one() {
            return Err("Fraction cannot be converted to a whole number".into());
        }
        Ok(self.num.clone())
    }

    pub fn pow(&self, exp: u32) -> BigFraction {
        (0..exp).fold(BigFraction::one(), |acc, _| acc * self.clone())
    }

    pub fn decimal_value(&self) -> f64 {
        self.num.to_f64().unwrap_or(f64::NAN) / self.den.to_f64().unwrap_or(f64::NAN)
    }
}

impl ops::Add for BigFraction {
    type Output = BigFraction;

    fn add(self, rhs: BigFraction) -> BigFraction {
        if self.den == rhs.den {
            return BigFraction::new(self.num + rhs.num, self.den);
        }

        BigFraction::new(
            &self.num * &rhs.den + &rhs.num * &self.den,
            &self.den * &rhs.den,
        )
    }
}

impl ops::Sub for BigFraction {
    type Output = BigFraction;

    fn sub(self, rhs: BigFraction) -> BigFraction {
        self + BigFraction {
            num: -rhs.num,
            den: rhs.den,
        }
    }
}

impl ops::Mul for BigFraction {
    type Output = BigFraction;

    fn mul(self, rhs: BigFraction) -> BigFraction {
        BigFraction::new(self.num * rhs.num, self.den * rhs.den)
    }
}

impl ops::Div for BigFraction {
    type Output = BigFraction;

    fn div(self, rhs: BigFraction) -> BigFraction {
        BigFraction::new(self.num * rhs.den, self.den * rhs.num)
    }
}

impl One for BigFraction {
    fn one() -> BigFraction {
        BigFraction {
            num: BigInt::one(),
            den: BigInt::one(),
        }
    }
}

impl Zero for BigFraction {
    fn zero() -> BigFraction {
        BigFraction {
            num: BigInt::zero(),
            den: BigInt::one(),
        }
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl Display for BigFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            return write!(f, "{}", self.num);
        }
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl PartialEq<i64> for BigFraction {
    fn eq(&self, rhs: &i64) -> bool {
        self.den.is_one() && self.num == BigInt::from(*rhs)
    }
}

impl PartialOrd for BigFraction {
    fn partial_cmp(&self, rhs: &BigFraction) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl Ord for BigFraction {
    fn cmp(&self, rhs: &BigFraction) -> Ordering {
        // denominators are positive, cross-multiplication preserves order
        (&self.num * &rhs.den).cmp(&(&rhs.num * &self.den))
    }
}

impl std::iter::Sum<BigFraction> for BigFraction {
    fn sum<I: Iterator<Item = BigFraction>>(iter: I) -> BigFraction {
        iter.fold(BigFraction::zero(), |acc, f| acc + f)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
