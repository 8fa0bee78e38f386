pub mod generator_service;
pub mod template_pool;

pub use generator_service::GeneratorService;
