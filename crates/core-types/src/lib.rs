//! # Rasoi Core Types
//!
//! Shared domain types for the order-management backend: the entity structs
//! that map to database rows, the enums that constrain order slots and
//! payment status, and the request payloads accepted by the HTTP API.
//!
//! Every other crate in the workspace depends on this one and nothing here
//! depends on the rest of the workspace.

pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{OrderStatus, OrderTime, PaidFilter};
pub use structs::{
    Admin, AdminProfile, Customer, CustomerWithOrders, Customization, Item, LoginRequest,
    NewCustomer, NewCustomization, NewOrder, NewProduct, Order, OrderItemInput, OrderUpdate,
    OrderWithItems, Product, ProductWithCustomizations, UpdateCustomer, UpdateCustomization,
};
