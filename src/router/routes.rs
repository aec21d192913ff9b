//! Static route table and path resolution.
//!
//! DESIGN
//! ======
//! Descriptors form a tree (layouts with children). At construction the tree
//! is flattened into match records, children before their parent, so a
//! layout's own path only matches when no child does. Records are tried in
//! that order; the first match wins. A record with `redirect` is followed
//! (inheriting the query and hash when the target has none) up to
//! [`MAX_REDIRECTS`] times.

use std::collections::BTreeMap;

use tracing::warn;

use crate::util::encode::decode_component;

pub const MAX_REDIRECTS: usize = 8;

// =============================================================================
// DESCRIPTORS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: Option<String>,
    pub requires_auth: bool,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Absolute (`/x`) or relative to the parent (`x`, `""`).
    pub path: String,
    pub name: Option<String>,
    /// Opaque view identifier for the frontend.
    pub component: String,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    #[must_use]
    pub fn new(path: &str, component: &str) -> Self {
        Self { path: path.to_owned(), component: component.to_owned(), ..Self::default() }
    }

    /// Component-less record that only redirects.
    #[must_use]
    pub fn redirect(path: &str, target: &str) -> Self {
        Self { path: path.to_owned(), redirect: Some(target.to_owned()), ..Self::default() }
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.meta.title = Some(title.to_owned());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: &str) -> Self {
        self.meta.icon = Some(icon.to_owned());
        self
    }

    #[must_use]
    pub fn requires_auth(mut self) -> Self {
        self.meta.requires_auth = true;
        self
    }

    #[must_use]
    pub fn redirect_to(mut self, target: &str) -> Self {
        self.redirect = Some(target.to_owned());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Normalized path without query or hash.
    pub path: String,
    /// Path plus the original query and hash.
    pub full_path: String,
    pub name: Option<String>,
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub hash: String,
    /// Merged over the matched chain; default when nothing matched.
    pub meta: RouteMeta,
    pub matched: bool,
}

impl ResolvedRoute {
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

#[derive(Debug, Clone)]
struct MatchRecord {
    segments: Vec<Segment>,
    name: Option<String>,
    redirect: Option<String>,
    meta: RouteMeta,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<MatchRecord>,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: &[RouteDescriptor]) -> Self {
        let mut records = Vec::new();
        for route in routes {
            flatten(route, "", &[], &mut records);
        }
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a location such as `/lost/detail/3?from=home#top`.
    #[must_use]
    pub fn resolve(&self, location: &str) -> ResolvedRoute {
        let mut current = location.to_owned();
        for _ in 0..=MAX_REDIRECTS {
            let resolved = self.match_location(&current);
            let Some(target) = resolved.1 else {
                return resolved.0;
            };
            current = inherit_suffix(&target, &resolved.0);
        }
        warn!(location, "redirect chain too long; stopping");
        self.match_location(&current).0
    }

    /// Match one location without following redirects; returns the route and
    /// the redirect target of the matched record, if any.
    fn match_location(&self, location: &str) -> (ResolvedRoute, Option<String>) {
        let (rest, hash) = location.split_once('#').unwrap_or((location, ""));
        let (raw_path, raw_query) = rest.split_once('?').unwrap_or((rest, ""));
        let path = normalize_path(raw_path);
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut full_path = path.clone();
        if !raw_query.is_empty() {
            full_path.push('?');
            full_path.push_str(raw_query);
        }
        if !hash.is_empty() {
            full_path.push('#');
            full_path.push_str(hash);
        }

        let mut route = ResolvedRoute {
            path: path.clone(),
            full_path,
            name: None,
            params: BTreeMap::new(),
            query: parse_query(raw_query),
            hash: hash.to_owned(),
            meta: RouteMeta::default(),
            matched: false,
        };

        for record in &self.records {
            if let Some(params) = match_segments(&record.segments, &parts) {
                route.name.clone_from(&record.name);
                route.params = params;
                route.meta = record.meta.clone();
                route.matched = true;
                return (route, record.redirect.clone());
            }
        }
        (route, None)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn flatten(route: &RouteDescriptor, parent: &str, chain: &[&RouteMeta], out: &mut Vec<MatchRecord>) {
    let full = join_path(parent, &route.path);
    let mut chain: Vec<&RouteMeta> = chain.to_vec();
    chain.push(&route.meta);

    for child in &route.children {
        flatten(child, &full, &chain, out);
    }
    out.push(MatchRecord {
        segments: parse_segments(&full),
        name: route.name.clone(),
        redirect: route.redirect.clone(),
        meta: merge_meta(&chain),
    });
}

fn join_path(parent: &str, path: &str) -> String {
    if path.starts_with('/') {
        return normalize_path(path);
    }
    if path.is_empty() {
        return normalize_path(parent);
    }
    normalize_path(&format!("{}/{path}", parent.trim_end_matches('/')))
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_segments(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some(param) => match param.split_once('(') {
                Some((name, _)) => Segment::CatchAll(name.to_owned()),
                None => Segment::Param(param.to_owned()),
            },
            None => Segment::Static(s.to_owned()),
        })
        .collect()
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::CatchAll(name) => {
                let rest: Vec<String> = parts.get(i..).unwrap_or_default().iter().map(|p| decode_component(p)).collect();
                params.insert(name.clone(), rest.join("/"));
                return Some(params);
            }
            Segment::Static(expected) => {
                if parts.get(i) != Some(&expected.as_str()) {
                    return None;
                }
            }
            Segment::Param(name) => {
                let value = parts.get(i)?;
                params.insert(name.clone(), decode_component(value));
            }
        }
    }
    (segments.len() == parts.len()).then_some(params)
}

fn merge_meta(chain: &[&RouteMeta]) -> RouteMeta {
    let mut merged = RouteMeta::default();
    for meta in chain {
        merged.requires_auth |= meta.requires_auth;
        if meta.title.is_some() {
            merged.title.clone_from(&meta.title);
        }
        if meta.icon.is_some() {
            merged.icon.clone_from(&meta.icon);
        }
    }
    merged
}

fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(&k.replace('+', " ")), decode_component(&v.replace('+', " ")))
        })
        .collect()
}

/// Carry the original query and hash onto a redirect target that has none.
fn inherit_suffix(target: &str, from: &ResolvedRoute) -> String {
    if target.contains('?') || target.contains('#') {
        return target.to_owned();
    }
    let suffix = from.full_path.strip_prefix(from.path.as_str()).unwrap_or("");
    format!("{target}{suffix}")
}

// =============================================================================
// APPLICATION ROUTES
// =============================================================================

/// The lost-and-found route table: public frontend, admin backend under
/// `/back`, auth pages and the 404 fallback.
#[must_use]
pub fn default_routes() -> Vec<RouteDescriptor> {
    let backend = RouteDescriptor::new("/back", "BackendLayout")
        .redirect_to("/back/dashboard")
        .with_children(vec![
            RouteDescriptor::new("dashboard", "backend/Dashboard").named("Dashboard").title("Dashboard").icon("HomeFilled"),
            RouteDescriptor::new("user", "backend/user/index").named("UserManagement").title("User Management").icon("User"),
            RouteDescriptor::new("profile", "profile/index").named("BackendProfile").title("Profile").icon("UserFilled"),
            RouteDescriptor::new("category", "backend/category/index")
                .named("CategoryManagement")
                .title("Category Management")
                .icon("Management"),
            RouteDescriptor::new("lost", "backend/lost/index").named("LostItemManagement").title("Lost Item Management").icon("List"),
            RouteDescriptor::new("found", "backend/found/index")
                .named("FoundItemManagement")
                .title("Found Item Management")
                .icon("Collection"),
            RouteDescriptor::new("claim", "backend/claim/index").named("ClaimManagement").title("Claim Management").icon("Checked"),
        ]);

    let frontend = RouteDescriptor::new("/", "FrontendLayout").with_children(vec![
        RouteDescriptor::new("", "frontend/Home").named("Home").title("Home"),
        RouteDescriptor::new("profile", "profile/index").named("Profile").title("Profile").requires_auth(),
        RouteDescriptor::new("notification", "frontend/notification/index")
            .named("Notification")
            .title("My Notifications")
            .requires_auth(),
        RouteDescriptor::new("lost", "frontend/lost/index").named("LostItemList").title("Lost Items"),
        RouteDescriptor::new("lost/detail/:id", "frontend/lost/detail").named("LostItemDetail").title("Lost Item Detail"),
        RouteDescriptor::new("lost/publish", "frontend/lost/publish")
            .named("LostItemPublish")
            .title("Publish Lost Item")
            .requires_auth(),
        RouteDescriptor::new("lost/edit/:id", "frontend/lost/edit").named("LostItemEdit").title("Edit Lost Item").requires_auth(),
        RouteDescriptor::new("found", "frontend/found/index").named("FoundItemList").title("Found Items"),
        RouteDescriptor::new("found/detail/:id", "frontend/found/detail").named("FoundItemDetail").title("Found Item Detail"),
        RouteDescriptor::new("found/publish", "frontend/found/publish")
            .named("FoundItemPublish")
            .title("Publish Found Item")
            .requires_auth(),
        RouteDescriptor::new("found/edit/:id", "frontend/found/edit")
            .named("FoundItemEdit")
            .title("Edit Found Item")
            .requires_auth(),
        RouteDescriptor::new("claim", "frontend/claim/index").named("MyClaims").title("My Claims").requires_auth(),
        RouteDescriptor::new("claim/audit", "frontend/claim/audit").named("MyClaimsAudit").title("Claims to Review").requires_auth(),
    ]);

    vec![
        frontend,
        RouteDescriptor::new("/login", "auth/Login").named("Login").title("Login"),
        RouteDescriptor::new("/register", "auth/Register").named("Register").title("Register"),
        backend,
        RouteDescriptor::new("/404", "error/404").named("NotFound").title("404 Not Found"),
        RouteDescriptor::redirect("/:pathMatch(.*)*", "/404"),
    ]
}
