mod invalidation_listener;

pub use invalidation_listener::ListingInvalidationListener;
