//! Resource catalogue
//!
//! Every Inventory entity the connector exposes, the operations each one
//! supports, and how an operation maps onto an HTTP call.
//!
//! # Overview
//!
//! An [`OperationRequest`] names a [`Resource`], an [`Operation`], an optional
//! record ID and a bag of payload fields. [`plan`] validates it and produces a
//! [`Plan`]: either a single [`Call`] or a list walk handed to the
//! [`Paginator`](crate::pagination::Paginator). [`execute`] runs the plan and
//! returns the simplified JSON result.

mod executor;
mod shaping;
mod types;

pub use executor::{execute, plan, Call, Plan, ResponseShape};
pub use shaping::{
    adjustment_line_items, email_fields, is_truthy, mapped_items, package_line_items,
    prepare_address, prepare_line_items, shape_addresses, split_ids, to_number,
    transfer_line_items, ListFilters, ADDRESS_FIELDS, EMAIL_FIELDS,
};
pub use types::{ListOptions, Operation, OperationRequest, Resource, DEFAULT_LIST_LIMIT};
