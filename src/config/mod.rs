pub mod policy;
pub mod resolver;
pub mod settings;

pub use policy::PolicyConfig;
pub use resolver::ConfigResolver;
pub use settings::{ConfigLocation, Settings};
