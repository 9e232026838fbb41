//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 모든 Repository는 static methods 패턴을 사용합니다.

pub mod categories;
pub mod orders;
pub mod products;
pub mod stock_movements;
pub mod suppliers;
pub mod users;

pub use categories::{CategoryRepository, NewCategory, UpdateCategory};
pub use orders::{NewOrder, NewOrderItem, OrderFilter, OrderItemDetail, OrderRepository};
pub use products::{NewProduct, ProductFilter, ProductRepository, UpdateProduct};
pub use stock_movements::{MovementFilter, MovementRecord, MovementRepository, NewMovement};
pub use suppliers::{NewSupplier, SupplierRepository, UpdateSupplier};
pub use users::{NewUser, UserRepository};
