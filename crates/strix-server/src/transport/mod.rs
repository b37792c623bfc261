mod tcp;

pub use tcp::HttpServer;
