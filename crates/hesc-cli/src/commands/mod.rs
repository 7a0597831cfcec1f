pub mod decode;
pub mod inspect;
