pub mod calc;

pub mod fractions {
    pub mod big_fraction;
    pub mod fraction;
}

pub mod matrix {
    pub mod matrix;
    pub mod matrix_float;
    pub mod matrix_int;
}

pub mod primes;
