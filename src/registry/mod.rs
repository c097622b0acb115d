//! Python installs registered in the Windows registry.
//!
//! Installers record interpreters under
//! `HKLM|HKCU\SOFTWARE\Python\<Company>\<Tag>\InstallPath` (PEP 514),
//! in both the 64-bit and the 32-bit registry views.
//!
//! # Walk Order
//!
//! 1. `LocalMachine`, then `CurrentUser`
//! 2. within each hive, the 64-bit view, then the 32-bit view
//! 3. companies and tags in registry enumeration order
//!
//! Consumers that need one record per interpreter take the first.
//!
//! # Modules
//!
//! - [`record`] - Raw entries and their conversion to descriptions
//! - [`reader`] - The registry tree walk
//! - [`locator`] - Deduplicated, lazily built descriptions

pub mod locator;
pub mod reader;
pub mod record;

pub use locator::{RegistryEnvs, RegistryLocator};
pub use reader::{read_interpreters, views, PYTHON_ROOT};
pub use record::RegistryRecord;
