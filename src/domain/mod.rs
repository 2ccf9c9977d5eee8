// Domain model for card templates

pub mod element;
pub mod template;

pub use element::Element;
