#![allow(dead_code)]

pub mod loan_csv;
pub mod loanlens_env;
