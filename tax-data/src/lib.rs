mod loader;

pub use loader::{ClientProfileLoader, ClientProfileLoaderError, ClientProfileRecord};
