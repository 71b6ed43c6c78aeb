pub mod error;
pub mod extraction;
pub mod filtering;
pub mod io;
pub mod layout;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod tags;
