use serde::{Deserialize, Serialize};

/// Defines a type-safe identifier wrapping the backend's integer `id_key`.
///
/// Each generated type carries `#[serde(transparent)]` so it serializes
/// as a bare number, plus `Display` and `From` conversions in both
/// directions.
macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from a raw backend key.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying integer key.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of an authenticated shop client.
    ClientId
}

define_id! {
    /// Identifier of a catalog product.
    ProductId
}

define_id! {
    /// Identifier of a delivery address.
    AddressId
}

define_id! {
    /// Identifier of a bill.
    BillId
}

define_id! {
    /// Identifier of an order.
    OrderId
}

define_id! {
    /// Identifier of a single order line.
    OrderDetailId
}
