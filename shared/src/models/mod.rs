//! Domain Models
//!
//! Database row types and the closed enums they carry. All tables use
//! snowflake i64 ids and millisecond timestamps.

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod order;
pub mod points;
pub mod product;
pub mod user;
pub mod warehouse;

pub use cart::{Cart, CartItem};
pub use catalog::{Brand, Category, SubCategory};
pub use coupon::{Coupon, CouponKind, CouponUsage};
pub use order::{Channel, Order, OrderItem, OrderStatus, PaymentStatus};
pub use points::{PointsConfig, PointsMode, StaticPointRequest};
pub use product::{ChosenProperty, PaymentKind, Product, Quality, QualityValue};
pub use user::{Role, User, UserAddress};
pub use warehouse::{Warehouse, WarehouseProduct};
