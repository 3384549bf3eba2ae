pub mod formatting;
pub mod icons;
