pub mod hostkit;
pub mod properties;
pub mod statement;
