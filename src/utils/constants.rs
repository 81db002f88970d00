/// URL del backend en desarrollo si no se configura otra
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Prefijo de las rutas lógicas de la API
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Prefijo de las claves en localStorage (una clave por colección)
pub const DEFAULT_STORAGE_PREFIX: &str = "eventPlanner_";

pub const DEFAULT_TIMEOUT_SECONDS: u32 = 10;

/// Content-Type considerado "datos estructurados" por defecto
pub const DEFAULT_STRUCTURED_CONTENT_TYPE: &str = "application/json";
