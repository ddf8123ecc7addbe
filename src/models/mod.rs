pub mod medical_record;
pub mod pet;
