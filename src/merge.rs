use crate::config::{Cluster, Configuration, NamedEntry, User};
use tracing::{debug, info};
use url::{Host, Url};

/// Name of the cluster entry read from the source configuration
pub const SOURCE_CLUSTER_NAME: &str = "kubernetes";
/// Name of the user entry read from the source configuration
pub const SOURCE_USER_NAME: &str = "kubernetes-admin";

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("cluster `{0}` is not defined in source configuration")]
    SourceClusterMissing(String),

    #[error("user `{0}` is not defined in source configuration")]
    SourceUserMissing(String),

    #[error("server name `{raw}` is not a valid URL: {source}")]
    InvalidServerUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

/// Entry names looked up in the source configuration.
///
/// They double as the prefixes of the names written to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNames {
    pub cluster: String,
    pub user: String,
}

impl Default for SourceNames {
    fn default() -> Self {
        Self { cluster: SOURCE_CLUSTER_NAME.to_string(), user: SOURCE_USER_NAME.to_string() }
    }
}

/// Destination entry names derived from the source server's hostname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    pub cluster: String,
    pub user: String,
    pub context: String,
}

impl DerivedNames {
    pub fn new(source: &SourceNames, hostname: &str) -> Self {
        let cluster = format!("{}-{hostname}", source.cluster);
        let user = format!("{}-{hostname}", source.user);
        let context = format!("{user}@{cluster}");
        Self { cluster, user, context }
    }
}

/// Whether an upsert touched an existing entry or appended a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub names: DerivedNames,
    pub cluster: Upsert,
    pub user: Upsert,
    pub context: Upsert,
}

/// Parse a server string, resolving references without a scheme (`""`, `//host:6443`) against
/// a non-special base so they keep an empty or opaque host.
fn parse_server(server: &str) -> Result<Url, url::ParseError> {
    match Url::parse(server) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("unix:/")?;
            Url::options().base_url(Some(&base)).parse(server)
        },
        result => result,
    }
}

/// Host text as written in `server`, so derived names keep the original case.
///
/// Falls back to the normalized `host` when the raw authority does not spell it (e.g. IDNA).
fn original_host(server: &str, host: &str) -> String {
    let authority_start = server.find("//").map_or(0, |index| index + 2);
    let rest = &server[authority_start..];
    let authority = &rest[..rest.find(['/', '?', '#']).unwrap_or(rest.len())];
    let host_part = authority.rsplit_once('@').map_or(authority, |(_, host_part)| host_part);

    host_part
        .get(..host.len())
        .filter(|raw| raw.eq_ignore_ascii_case(host))
        .map_or_else(|| host.to_string(), str::to_string)
}

/// Hostname of a server URL, without IPv6 brackets
///
/// # Errors
///
/// Returns [`MergeError::InvalidServerUrl`] if `server` does not parse as a URL
pub fn server_hostname(server: &str) -> Result<String, MergeError> {
    let url = parse_server(server)
        .map_err(|source| MergeError::InvalidServerUrl { raw: server.to_string(), source })?;

    Ok(match url.host() {
        Some(Host::Ipv6(addr)) => addr.to_string(),
        Some(Host::Domain(domain)) => original_host(server, domain),
        Some(host) => host.to_string(),
        None => String::new(),
    })
}

/// Find `name` in `entries`, appending a fresh entry when absent.
///
/// Existing entries keep their position.
fn upsert<'a, E: NamedEntry>(entries: &'a mut Vec<E>, name: &str) -> (&'a mut E, Upsert) {
    if let Some(index) = entries.iter().position(|entry| entry.name() == name) {
        return (&mut entries[index], Upsert::Updated);
    }

    entries.push(E::with_name(name));
    let last = entries.len() - 1;
    (&mut entries[last], Upsert::Inserted)
}

/// Merges the `kubernetes` cluster and `kubernetes-admin` user of `source` into `destination`.
///
/// # Errors
///
/// Returns an error if the source cluster or user is missing, or the cluster server is not a
/// valid URL. The destination is left untouched in that case.
pub fn merge(
    source: &Configuration,
    destination: &mut Configuration,
) -> Result<MergeReport, MergeError> {
    merge_with_names(source, destination, &SourceNames::default())
}

/// Merges one cluster/user pair of `source`, selected by `names`, into `destination`.
///
/// Entries are upserted under names derived from the cluster server's hostname, a context
/// binding them is upserted, and that context becomes the current one. Unrelated entries and
/// the destination's `apiVersion`/`kind` are never touched.
///
/// # Errors
///
/// Returns an error if the source cluster or user is missing, or the cluster server is not a
/// valid URL. Every source input is resolved before the destination is mutated, so on error
/// the destination is unchanged.
pub fn merge_with_names(
    source: &Configuration,
    destination: &mut Configuration,
    names: &SourceNames,
) -> Result<MergeReport, MergeError> {
    let source_cluster = source
        .lookup_cluster(&names.cluster)
        .ok_or_else(|| MergeError::SourceClusterMissing(names.cluster.clone()))?;

    let hostname = server_hostname(&source_cluster.cluster.server)?;
    let derived = DerivedNames::new(names, &hostname);

    let source_user = source
        .lookup_user(&names.user)
        .ok_or_else(|| MergeError::SourceUserMissing(names.user.clone()))?;

    debug!("Derived names from host `{hostname}`: {derived:?}");

    let cluster = upsert_cluster(destination, &derived.cluster, &source_cluster.cluster);
    let user = upsert_user(destination, &derived.user, &source_user.user);
    let context = upsert_context(destination, &derived);

    destination.current_context.clone_from(&derived.context);
    info!("Current context set to {}", derived.context);

    Ok(MergeReport { names: derived, cluster, user, context })
}

fn upsert_cluster(destination: &mut Configuration, name: &str, payload: &Cluster) -> Upsert {
    let (entry, outcome) = upsert(&mut destination.clusters, name);
    entry.cluster = payload.clone();
    debug!("Cluster {name}: {outcome:?}");
    outcome
}

fn upsert_user(destination: &mut Configuration, name: &str, payload: &User) -> Upsert {
    let (entry, outcome) = upsert(&mut destination.users, name);
    entry.user = payload.clone();
    debug!("User {name}: {outcome:?}");
    outcome
}

fn upsert_context(destination: &mut Configuration, derived: &DerivedNames) -> Upsert {
    let (entry, outcome) = upsert(&mut destination.contexts, &derived.context);
    // Repoint references; extra fields such as `namespace` stay
    entry.context.cluster.clone_from(&derived.cluster);
    entry.context.user.clone_from(&derived.user);
    debug!("Context {}: {outcome:?}", derived.context);
    outcome
}
