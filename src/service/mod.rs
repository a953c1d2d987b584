pub mod error;
pub mod gas;
pub mod registry;
pub mod router;
pub mod swap;
pub mod tasks;
pub mod types;
pub mod utils;


pub use error::ServiceError;
pub use registry::{AddressBook, NetworkEntry};
pub use router::{RouteDiscovery, SmartRouter};
pub use swap::{ExecutionTarget, SwapExecutor};
pub use tasks::TaskService;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
