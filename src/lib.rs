pub mod engine;
pub mod generate;
pub mod headless;
pub mod highlight;
pub mod layout;
pub mod render;
pub mod skill;
pub mod store;
