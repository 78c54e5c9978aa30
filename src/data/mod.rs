//! Conversion between norad's UFO types and the object graph

pub mod conversions;
