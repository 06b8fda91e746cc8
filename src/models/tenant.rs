use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant record as listed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub theme_primary: Option<String>,
    #[serde(default)]
    pub theme_secondary: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Tenant with its owners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantDetail {
    #[serde(flatten)]
    pub summary: TenantSummary,
    #[serde(default)]
    pub owners: Option<Vec<OwnerSummary>>,
    #[serde(default)]
    pub owners_count: Option<u32>,
}

impl TenantDetail {
    pub fn id(&self) -> i64 {
        self.summary.id
    }

    /// Owner count, preferring the server's aggregate over the list length
    pub fn owner_count(&self) -> usize {
        self.owners_count
            .map(|count| count as usize)
            .or_else(|| self.owners.as_ref().map(Vec::len))
            .unwrap_or(0)
    }
}

/// Body of `POST /tenants/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InviteOwnerRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignOwnerRequest {
    pub user_id: i64,
}

/// Invitation created by `invite-owner`; only `token` is guaranteed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerInvitation {
    pub token: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tenant_detail_flattens_summary() {
        let detail: TenantDetail = serde_json::from_value(json!({
            "id": 4,
            "name": "Padel Club",
            "slug": "padel",
            "logo_url": "",
            "theme_primary": "#112233",
            "theme_secondary": null,
            "address": "1 rue du Stade",
            "contact_email": "contact@padel.test",
            "is_active": true,
            "owners_count": 2,
            "owners": [{"id": 1, "email": "a@padel.test", "first_name": "A", "last_name": "B"}]
        }))
        .unwrap();
        assert_eq!(detail.id(), 4);
        assert_eq!(detail.summary.theme_secondary, None);
        assert_eq!(detail.owner_count(), 2);
    }

    #[test]
    fn test_create_tenant_skips_empty_fields() {
        let payload = CreateTenant {
            name: "Club".into(),
            slug: "club".into(),
            is_active: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "Club", "slug": "club", "is_active": true})
        );
    }

    #[test]
    fn test_invitation_tolerates_minimal_body() {
        let invitation: OwnerInvitation = serde_json::from_value(json!({"token": "abc"})).unwrap();
        assert_eq!(invitation.token, "abc");
        assert!(invitation.expires_at.is_none());

        let invitation: OwnerInvitation = serde_json::from_value(json!({
            "id": 12,
            "email": "owner@club.test",
            "token": "def",
            "status": "PENDING",
            "expires_at": "2026-10-26T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(invitation.status.as_deref(), Some("PENDING"));
        assert!(invitation.expires_at.is_some());
    }
}
