use user_tonic_core::{
    proto::{ListUsersResponse, UserResponse},
    types::{Page, User, format_timestamp},
};

/// Maps a stored user onto its wire form. Unset values become `0` or `""`.
pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.unwrap_or_default(),
        name: user.name.clone(),
        email: user.email.clone(),
        age: user.age.unwrap_or_default(),
        created_at: format_timestamp(user.created_at.as_ref()),
        updated_at: format_timestamp(user.updated_at.as_ref()),
    }
}

pub fn list_users_response(page: &Page<User>) -> ListUsersResponse {
    ListUsersResponse {
        total: i64::try_from(page.total).unwrap_or(i64::MAX),
        users: page.items.iter().map(user_response).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fills_unset_fields_with_defaults() {
        let response = user_response(&User::new("Alice", "alice@example.com", None));
        assert_eq!(response.id, 0);
        assert_eq!(response.age, 0);
        assert_eq!(response.created_at, "");
        assert_eq!(response.updated_at, "");
    }

    #[test]
    fn formats_stored_user() {
        let created = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let updated = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let user = User {
            id: Some(7),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            age: Some(30),
            created_at: Some(created),
            updated_at: Some(updated),
        };

        assert_eq!(
            user_response(&user),
            UserResponse {
                id: 7,
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                age: 30,
                created_at: "2025-01-02 03:04:05".to_string(),
                updated_at: "2025-12-31 23:59:59".to_string(),
            }
        );
    }

    #[test]
    fn list_response_keeps_order_and_total() {
        let page = Page {
            items: vec![User::new("a", "a@x", Some(1)), User::new("b", "b@x", None)],
            total: 12,
        };
        let response = list_users_response(&page);
        assert_eq!(response.total, 12);
        assert_eq!(
            response.users.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }
}
