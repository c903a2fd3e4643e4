pub mod attack;
pub mod count;
pub mod encrypt;
