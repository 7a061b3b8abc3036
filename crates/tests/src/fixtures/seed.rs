use serde_json::Value;

use super::test_app::TestApp;

/// Result of seeding a test organization with an admin, a staff user and a
/// client user.
pub struct SeededOrg {
    pub organization_id: String,
    pub slug: String,
    pub admin: SeededUser,
    pub staff: SeededUser,
    pub client: SeededUser,
}

pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Mint a superadmin console token from the configured credentials.
    pub async fn superadmin_token(&self) -> String {
        let resp = self
            .client
            .post(self.url("/superadmin/login"))
            .json(&serde_json::json!({
                "email": self.settings.superadmin.email,
                "password": self.settings.superadmin.password,
            }))
            .send()
            .await
            .expect("Superadmin login request failed");
        assert_eq!(resp.status().as_u16(), 200);

        let json: Value = resp.json().await.expect("Failed to parse login response");
        json["token"].as_str().unwrap().to_string()
    }

    pub async fn login_user(&self, email: &str, password: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed");
        assert!(
            resp.status().is_success(),
            "Login failed: {}",
            resp.text().await.unwrap_or_default()
        );

        let json: Value = resp.json().await.expect("Failed to parse login response");
        SeededUser {
            id: json["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            access_token: json["access_token"].as_str().unwrap().to_string(),
            refresh_token: json["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// Seed a full organization: superadmin creates it with an admin, then
    /// the admin provisions one staff and one client user.
    pub async fn seed_org(&self, slug: &str) -> SeededOrg {
        self.seed_org_with_demo(slug, false).await
    }

    pub async fn seed_org_with_demo(&self, slug: &str, is_demo: bool) -> SeededOrg {
        let superadmin = self.superadmin_token().await;

        let admin_email = format!("admin@{}.test", slug);
        let resp = self
            .auth_post("/superadmin/organizations", &superadmin)
            .json(&serde_json::json!({
                "name": format!("{} Legal", slug),
                "slug": slug,
                "is_demo": is_demo,
                "admin_email": admin_email,
                "admin_full_name": format!("{} Admin", slug),
                "admin_password": "Admin123!pass",
            }))
            .send()
            .await
            .expect("Create organization failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Create organization failed: {}",
            resp.text().await.unwrap_or_default()
        );
        let json: Value = resp.json().await.unwrap();
        let organization_id = json["organization"]["id"].as_str().unwrap().to_string();

        let admin = self.login_user(&admin_email, "Admin123!pass").await;

        let staff_email = format!("staff@{}.test", slug);
        let resp = self
            .auth_post("/api/users", &admin.access_token)
            .json(&serde_json::json!({
                "email": staff_email,
                "full_name": format!("{} Staff", slug),
                "role": "staff",
                "password": "Staff123!pass",
            }))
            .send()
            .await
            .expect("Create staff failed");
        assert_eq!(resp.status().as_u16(), 201);

        let client_email = format!("client@{}.test", slug);
        let resp = self
            .auth_post("/api/users", &admin.access_token)
            .json(&serde_json::json!({
                "email": client_email,
                "full_name": format!("{} Client", slug),
                "role": "client",
                "password": "Client123!pass",
            }))
            .send()
            .await
            .expect("Create client failed");
        assert_eq!(resp.status().as_u16(), 201);

        let staff = self.login_user(&staff_email, "Staff123!pass").await;
        let client = self.login_user(&client_email, "Client123!pass").await;

        SeededOrg {
            organization_id,
            slug: slug.to_string(),
            admin,
            staff,
            client,
        }
    }

    /// Create a case as staff for the given client, returning its JSON.
    pub async fn seed_case(&self, org: &SeededOrg, title: &str) -> Value {
        let resp = self
            .auth_post("/api/cases", &org.staff.access_token)
            .json(&serde_json::json!({
                "title": title,
                "case_type": "asylum",
                "client_id": org.client.id,
                "assigned_staff_id": org.staff.id,
            }))
            .send()
            .await
            .expect("Create case failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Create case failed: {}",
            resp.text().await.unwrap_or_default()
        );
        resp.json().await.expect("Failed to parse case response")
    }
}
