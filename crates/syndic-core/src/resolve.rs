//! Cross-reference resolution between entity kinds.
//!
//! References between kinds are informal identifier equality that the source
//! never enforces. Lookup maps are built once per generation and shared by
//! every report; a dangling or missing reference resolves to [`UNKNOWN`] (or
//! [`Sex::Unknown`]) rather than failing.

use std::collections::HashMap;

use crate::model::{Member, Sex, Union};

/// Placeholder for any attribute that cannot be resolved.
pub const UNKNOWN: &str = "Unknown";

/// Identifier → record lookup over a borrowed collection.
///
/// When identifiers repeat, the first record wins.
#[derive(Debug, Clone)]
pub struct Index<'a, T> {
    by_key: HashMap<&'a str, &'a T>,
}

impl<'a, T> Index<'a, T> {
    #[must_use]
    pub fn build<I>(records: I, key: impl Fn(&'a T) -> &'a str) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        let mut by_key = HashMap::new();
        for record in records {
            by_key.entry(key(record)).or_insert(record);
        }
        Self { by_key }
    }

    #[must_use]
    pub fn get(&self, key: Option<&str>) -> Option<&'a T> {
        key.and_then(|key| self.by_key.get(key).copied())
    }
}

/// Denormalization helpers over the union and member indexes.
#[derive(Debug, Clone)]
pub struct CrossRef<'a> {
    pub unions: Index<'a, Union>,
    pub members: Index<'a, Member>,
}

impl<'a> CrossRef<'a> {
    #[must_use]
    pub fn build(unions: &'a [Union], members: &'a [Member]) -> Self {
        Self {
            unions: Index::build(unions, |u| u.id.as_str()),
            members: Index::build(members, |m| m.id.as_str()),
        }
    }

    #[must_use]
    pub fn union(&self, union_id: Option<&str>) -> Option<&'a Union> {
        self.unions.get(union_id)
    }

    #[must_use]
    pub fn union_name(&self, union_id: Option<&str>) -> &'a str {
        self.union(union_id).map_or(UNKNOWN, Union::display_name)
    }

    #[must_use]
    pub fn union_sector(&self, union_id: Option<&str>) -> &'a str {
        self.union(union_id)
            .and_then(|u| u.sector.as_deref())
            .unwrap_or(UNKNOWN)
    }

    #[must_use]
    pub fn union_organization(&self, union_id: Option<&str>) -> &'a str {
        self.union(union_id)
            .and_then(|u| u.organization.as_deref())
            .unwrap_or(UNKNOWN)
    }

    #[must_use]
    pub fn member_name(&self, member_id: Option<&str>) -> &'a str {
        self.members
            .get(member_id)
            .and_then(|m| m.name.as_deref())
            .unwrap_or(UNKNOWN)
    }

    #[must_use]
    pub fn member_sex(&self, member_id: Option<&str>) -> Sex {
        self.members.get(member_id).map_or(Sex::Unknown, |m| m.sex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unions() -> Vec<Union> {
        vec![
            Union {
                id: "u1".into(),
                name: Some("Teachers".into()),
                sector: Some("Education".into()),
                organization: Some("Ministry".into()),
                ..Union::default()
            },
            Union {
                id: "u1".into(),
                name: Some("Shadowed".into()),
                ..Union::default()
            },
            Union {
                id: "u2".into(),
                code: Some("BWU".into()),
                ..Union::default()
            },
        ]
    }

    fn members() -> Vec<Member> {
        vec![Member {
            id: "m1".into(),
            name: Some("Hana Tesfaye".into()),
            sex: Sex::Female,
            ..Member::default()
        }]
    }

    #[test]
    fn first_record_wins_on_duplicate_ids() {
        let unions = unions();
        let members = members();
        let xref = CrossRef::build(&unions, &members);
        assert_eq!(xref.union_name(Some("u1")), "Teachers");
        assert!(xref.union(Some("u2")).is_some());
    }

    #[test]
    fn dangling_references_resolve_to_unknown() {
        let unions = unions();
        let members = members();
        let xref = CrossRef::build(&unions, &members);
        assert_eq!(xref.union_sector(Some("missing")), UNKNOWN);
        assert_eq!(xref.union_organization(None), UNKNOWN);
        assert_eq!(xref.union_sector(Some("u2")), UNKNOWN);
        assert_eq!(xref.union_name(Some("u2")), "BWU");
        assert_eq!(xref.member_name(Some("m404")), UNKNOWN);
        assert_eq!(xref.member_sex(None), Sex::Unknown);
    }

    #[test]
    fn resolves_member_attributes() {
        let unions = unions();
        let members = members();
        let xref = CrossRef::build(&unions, &members);
        assert_eq!(xref.member_name(Some("m1")), "Hana Tesfaye");
        assert_eq!(xref.member_sex(Some("m1")), Sex::Female);
        assert_eq!(xref.union_sector(Some("u1")), "Education");
    }
}
