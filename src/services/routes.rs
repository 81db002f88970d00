// ============================================================================
// ROUTES - Tabla de rutas de fallback (método + patrón -> operación local)
// ============================================================================
// Lista ordenada; gana la primera coincidencia.
// ============================================================================

use std::collections::HashMap;

use super::api_client::HttpMethod;
use crate::models::Collection;

/// Segmento de un patrón: literal o parámetro (`:id`)
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Patrón de ruta del estilo `/users/:id/expenses`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Devuelve los parámetros capturados si la ruta coincide
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Operación del almacén local a la que se enruta el fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalAction {
    Insert(Collection),
    Update(Collection),
    Delete(Collection),
    GetById(Collection),
    ListByOwner(Collection),
}

impl LocalAction {
    pub fn is_write(&self) -> bool {
        matches!(self, LocalAction::Insert(_) | LocalAction::Update(_) | LocalAction::Delete(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub pattern: PathPattern,
    pub action: LocalAction,
}

impl Route {
    pub fn new(method: HttpMethod, pattern: &str, action: LocalAction) -> Self {
        Self {
            method,
            pattern: PathPattern::parse(pattern),
            action,
        }
    }
}

/// Ruta resuelta con sus parámetros (`id`, `owner`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub action: LocalAction,
    pub params: HashMap<String, String>,
}

impl ResolvedRoute {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    prefix: String,
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(prefix: &str, routes: Vec<Route>) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            routes,
        }
    }

    /// Tabla por defecto del planificador
    pub fn default_routes(prefix: &str) -> Self {
        let mut routes = vec![
            Route::new(HttpMethod::Post, "/users", LocalAction::Insert(Collection::Users)),
            Route::new(HttpMethod::Put, "/users/:id", LocalAction::Update(Collection::Users)),
            Route::new(HttpMethod::Get, "/users/:id", LocalAction::GetById(Collection::Users)),
        ];

        for collection in [Collection::Expenses, Collection::Vendors, Collection::Guests, Collection::Tasks] {
            let root = format!("/{}", collection.name());
            let item = format!("/{}/:id", collection.name());
            routes.push(Route::new(HttpMethod::Post, &root, LocalAction::Insert(collection)));
            routes.push(Route::new(HttpMethod::Put, &item, LocalAction::Update(collection)));
            routes.push(Route::new(HttpMethod::Delete, &item, LocalAction::Delete(collection)));
        }

        // Las inspiraciones no se editan
        routes.push(Route::new(
            HttpMethod::Post,
            "/inspirations",
            LocalAction::Insert(Collection::Inspirations),
        ));
        routes.push(Route::new(
            HttpMethod::Delete,
            "/inspirations/:id",
            LocalAction::Delete(Collection::Inspirations),
        ));

        for collection in Collection::ALL.into_iter().filter(|c| *c != Collection::Users) {
            let list = format!("/users/:owner/{}", collection.name());
            routes.push(Route::new(HttpMethod::Get, &list, LocalAction::ListByOwner(collection)));
        }

        Self::new(prefix, routes)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Quita query string y prefijo de API
    fn normalize<'a>(&self, path: &'a str) -> &'a str {
        let path = path.split(['?', '#']).next().unwrap_or("");
        if self.prefix.is_empty() {
            return path;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    }

    pub fn resolve(&self, method: HttpMethod, path: &str) -> Option<ResolvedRoute> {
        let path = self.normalize(path);
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                route.pattern.matches(path).map(|params| ResolvedRoute {
                    action: route.action,
                    params,
                })
            })
    }
}
