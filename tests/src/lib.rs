//! End-to-end discovery runs against mock accessories on loopback.

#[cfg(test)]
mod utils;
