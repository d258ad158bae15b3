//! Domain types shared by the console core, the onboarding model and the
//! console binary.

pub mod domain;
pub mod entities;
pub mod error;
pub mod protocol;
pub mod record;
