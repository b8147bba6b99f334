//! Concrete transport adapters behind the `Read + Write` seam the drivers
//! are generic over.

pub mod tcp;
