pub mod appwrite;
pub mod probe;

pub use appwrite::AppwriteSource;
pub use probe::ConnectivityProbe;
