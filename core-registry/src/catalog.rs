//! The storefront's entity declarations.

use crate::descriptor::EntityDescriptor;
use crate::error::Result;
use crate::field::FieldSpec;
use crate::registry::EntityRegistry;
use core_gateway::{HttpGateway, PayloadPolicy};

pub const USERS: &str = "users";
pub const CATEGORIES: &str = "categories";
pub const PRODUCTS: &str = "products";
pub const BRANDS: &str = "brands";
pub const ORDERS: &str = "orders";
pub const POSTS: &str = "posts";

/// Workflow states of an order, in lifecycle order.
pub const ORDER_STATUSES: [&str; 4] = ["PENDING", "PAID", "FULFILLED", "CANCELED"];

/// Build the registry of every storefront entity over `gateway`.
pub fn storefront_registry(gateway: &HttpGateway) -> Result<EntityRegistry> {
    EntityRegistry::new([
        users(gateway),
        categories(gateway),
        products(gateway),
        brands(gateway),
        orders(gateway),
        posts(gateway),
    ])
}

fn users(gateway: &HttpGateway) -> EntityDescriptor {
    EntityDescriptor::builder(USERS, "Users")
        .field(FieldSpec::text("name", "Name"))
        .field(FieldSpec::text("email", "Email"))
        .field(FieldSpec::select("role", "Role", ["admin", "user"]))
        .field(FieldSpec::boolean("isActive", "Active"))
        .build(gateway)
}

fn categories(gateway: &HttpGateway) -> EntityDescriptor {
    EntityDescriptor::builder(CATEGORIES, "Categories")
        .field(FieldSpec::text("name", "Name"))
        .field(FieldSpec::text("slug", "Slug"))
        .build(gateway)
}

// Product writes always carry a status, INACTIVE unless given.
fn products(gateway: &HttpGateway) -> EntityDescriptor {
    EntityDescriptor::builder(PRODUCTS, "Products")
        .field(FieldSpec::text("name", "Name"))
        .field(FieldSpec::text("slug", "Slug"))
        .field(FieldSpec::textarea("description", "Description"))
        .field(FieldSpec::number("price", "Price"))
        .field(FieldSpec::text("currency", "Currency"))
        .field(FieldSpec::number("stock", "Stock"))
        .field(FieldSpec::media("image", "Image"))
        .field(FieldSpec::media("video", "Video"))
        .policy(PayloadPolicy::RequireStatus)
        .build(gateway)
}

fn brands(gateway: &HttpGateway) -> EntityDescriptor {
    EntityDescriptor::builder(BRANDS, "Brands")
        .field(FieldSpec::text("name", "Name"))
        .field(FieldSpec::text("slug", "Slug"))
        .field(FieldSpec::textarea("description", "Description"))
        .field(FieldSpec::boolean("isActive", "Active"))
        .toggle()
        .build(gateway)
}

fn orders(gateway: &HttpGateway) -> EntityDescriptor {
    EntityDescriptor::builder(ORDERS, "Orders")
        .field(FieldSpec::number("id", "ID"))
        .field(FieldSpec::text("user", "User"))
        .field(FieldSpec::number("subtotal", "Subtotal"))
        .field(FieldSpec::number("shippingFee", "Shipping Fee"))
        .field(FieldSpec::number("total", "Total"))
        .field(FieldSpec::select("status", "Status", ORDER_STATUSES))
        .status_transition()
        .build(gateway)
}

fn posts(gateway: &HttpGateway) -> EntityDescriptor {
    EntityDescriptor::builder(POSTS, "Posts")
        .field(FieldSpec::text("title", "Title"))
        .field(FieldSpec::text("slug", "Slug"))
        .field(FieldSpec::textarea("content", "Content"))
        .field(FieldSpec::text("coverImage", "Cover Image"))
        .field(FieldSpec::boolean("published", "Published"))
        .toggle()
        .build(gateway)
}
