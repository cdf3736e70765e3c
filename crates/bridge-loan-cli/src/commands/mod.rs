pub mod economics;
pub mod reference;
pub mod sensitivity;
