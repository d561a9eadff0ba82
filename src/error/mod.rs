pub mod ring_error;
