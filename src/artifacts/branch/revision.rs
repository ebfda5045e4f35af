use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::RefName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;

/// Minimum number of hex characters accepted as an abbreviated oid
const MIN_ABBREV_OID_LENGTH: usize = 4;

/// A revision expression identifying a snapshot.
///
/// Supports multiple formats:
/// - Ref names: `master`, `mirrors/default`, `HEAD`
/// - Aliases: `@` (resolves to `HEAD`)
/// - Full OIDs: 40-character hexadecimal strings
/// - Abbreviated OIDs: 4-40 character hexadecimal prefixes
/// - Parent notation: `<revision>^`
/// - Ancestor notation: `<revision>~<n>`
///
/// OID-like strings are initially parsed as `Ref` variants. During
/// resolution, if no ref with that name exists, the resolver falls back to
/// object-id lookup, matching the precedence git applies when a name is
/// ambiguous.
#[derive(Debug, Clone)]
pub enum Revision {
    /// A ref name, or potentially an OID (decided during resolution)
    Ref(RefName),
    /// The Nth ancestor of a revision (e.g., HEAD~3)
    Ancestor(Box<Revision>, usize),
    /// The parent of a revision (e.g., HEAD^)
    Parent(Box<Revision>),
}

impl Revision {
    pub fn parse(revision: &str) -> anyhow::Result<Self> {
        let revision = REF_ALIASES.get(revision).copied().unwrap_or(revision);

        let parent_re = regex::Regex::new(PARENT_REGEX)?;
        if let Some(captures) = parent_re.captures(revision) {
            let base = Self::parse(&captures[1])?;
            return Ok(Revision::Parent(Box::new(base)));
        }

        let ancestor_re = regex::Regex::new(ANCESTOR_REGEX)?;
        if let Some(captures) = ancestor_re.captures(revision) {
            let base = Self::parse(&captures[1])?;
            let generations = captures[2]
                .parse::<usize>()
                .with_context(|| format!("invalid ancestor count in {revision}"))?;
            return Ok(Revision::Ancestor(Box::new(base), generations));
        }

        Ok(Revision::Ref(RefName::try_parse(revision.to_string())?))
    }

    /// Resolve this revision to a snapshot oid, erroring when it names
    /// nothing
    pub fn resolve_required(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        self.resolve(repository)?
            .ok_or_else(|| anyhow::anyhow!("revision does not point at any snapshot"))
    }

    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        match self {
            Revision::Ref(ref_name) => {
                let name_str = ref_name.as_ref();

                // Try to resolve as a ref first
                match repository.refs().read_ref(ref_name.clone()) {
                    Ok(Some(oid)) => Ok(Some(oid)),
                    Ok(None) => Ok(None),
                    Err(_) => {
                        // Ref doesn't exist - try OID if it looks like one
                        if Self::looks_like_oid(name_str) {
                            Self::resolve_oid(name_str, repository).map(Some)
                        } else {
                            Err(anyhow::anyhow!("unknown revision: {}", name_str))
                        }
                    }
                }
            }
            Revision::Parent(base_revision) => {
                Self::resolve_snapshot_parent(base_revision.resolve(repository)?, repository)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_snapshot_parent(oid, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_snapshot_parent(
        oid: Option<ObjectId>,
        repository: &Repository,
    ) -> anyhow::Result<Option<ObjectId>> {
        if let Some(oid) = oid {
            let commit = repository
                .database()
                .parse_object_as_commit(&oid)?
                .ok_or_else(|| anyhow::anyhow!("object {} is not a snapshot", oid))?;

            Ok(commit.parent().cloned())
        } else {
            Ok(None)
        }
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        // A full OID needs no search, only validation
        if oid_str.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(oid_str.to_string())?;
            Self::validate_oid_is_commit(&oid, repository)?;
            return Ok(oid);
        }

        let candidates = repository.database().find_objects_by_prefix(oid_str)?;

        match candidates.len() {
            0 => Err(anyhow::anyhow!("unknown revision: {}", oid_str)),
            1 => {
                let oid = candidates.into_iter().next().unwrap_or_default();
                Self::validate_oid_is_commit(&oid, repository)?;
                Ok(oid)
            }
            _ => {
                let mut lines = vec![format!("short object id {} is ambiguous", oid_str)];
                for candidate in &candidates {
                    let object_type = repository.database().get_object_type(candidate)?;
                    lines.push(format!("  {} {}", candidate, object_type));
                }

                Err(anyhow::anyhow!(lines.join("\n")))
            }
        }
    }

    fn validate_oid_is_commit(oid: &ObjectId, repository: &Repository) -> anyhow::Result<()> {
        let object_type = repository
            .database()
            .get_object_type(oid)
            .with_context(|| format!("unknown revision: {}", oid))?;

        if object_type != ObjectType::Commit {
            anyhow::bail!("object {} is a {}, not a snapshot", oid, object_type);
        }

        Ok(())
    }

    fn looks_like_oid(s: &str) -> bool {
        s.len() >= MIN_ABBREV_OID_LENGTH
            && s.len() <= OBJECT_ID_LENGTH
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}
