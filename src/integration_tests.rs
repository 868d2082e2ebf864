#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use chrono::Utc;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    use crate::app_system::{bootstrap, Config, MarketSystem, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
    use crate::clients::{OrderClient, ProjectClient, UserClient};
    use crate::domain::{InquiryStatus, Order, PaymentStatus, Project, User};
    use crate::file_store::Upload;
    use crate::http::{build_router, AppState};
    use crate::inquiry_actor::InquiryError;
    use crate::mock_framework::{
        create_mock_client, expect_action, expect_create, expect_find_by_key, expect_get,
    };
    use crate::order_actor::OrderError;
    use crate::project_actor::{ProjectAction, ProjectActionResult, ProjectError};
    use crate::services::catalog::ProjectFilter;
    use crate::services::inputs::{ContactInput, InquiryInput, LoginInput, ProjectInput, RegisterInput};
    use crate::services::Identity;
    use crate::user_actor::UserError;

    // -------------------------------------------------------------------------
    // Client orchestration against mocked actors
    // -------------------------------------------------------------------------

    fn sample_user(id: u64) -> User {
        User {
            id,
            name: "Buyer".to_string(),
            email: "buyer@example.com".to_string(),
            password_hash: "hash".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    fn sample_project(id: u64, price: f64) -> Project {
        Project {
            id,
            title: "Lib System".to_string(),
            description: "Library management".to_string(),
            price,
            file_path: "stored_a.zip".to_string(),
            category: "Web Development".to_string(),
            tech_stack: "Rust".to_string(),
            branch: "Computer Science".to_string(),
            uploaded_date: Utc::now(),
            preview_image: None,
        }
    }

    #[tokio::test]
    async fn test_place_order_flow() {
        // 1. Setup Mocks
        let (user_client_inner, mut user_rx) = create_mock_client::<User>(10);
        let (project_client_inner, mut project_rx) = create_mock_client::<Project>(10);
        let (order_client_inner, mut order_rx) = create_mock_client::<Order>(10);

        let user_client = UserClient::new(user_client_inner);
        let project_client = ProjectClient::new(project_client_inner);
        let order_client = OrderClient::new(order_client_inner, user_client, project_client);

        // 2. Execute the purchase in background
        let order_task = tokio::spawn(async move { order_client.place_order(7, 3).await });

        // 3. Verify Interactions

        // Expect User Get
        let (user_id, responder) = expect_get(&mut user_rx).await.expect("Expected User Get");
        assert_eq!(user_id, 7);
        responder.send(Ok(Some(sample_user(7)))).unwrap();

        // Expect Project Get
        let (project_id, responder) = expect_get(&mut project_rx).await.expect("Expected Project Get");
        assert_eq!(project_id, 3);
        responder.send(Ok(Some(sample_project(3, 100.0)))).unwrap();

        // Expect Order Create with the price snapshot
        let (payload, responder) = expect_create(&mut order_rx).await.expect("Expected Order Create");
        assert_eq!(payload.user_id, 7);
        assert_eq!(payload.project_id, 3);
        assert_eq!(payload.amount, 100.0);
        assert_eq!(payload.payment_status, PaymentStatus::Completed);
        assert!(!payload.transaction_id.is_empty());
        let transaction_id = payload.transaction_id.clone();
        responder.send(Ok(11)).unwrap();

        // The client reads the stored order back
        let (order_id, responder) = expect_get(&mut order_rx).await.expect("Expected Order Get");
        assert_eq!(order_id, 11);
        let stored = Order {
            id: 11,
            user_id: 7,
            project_id: 3,
            payment_status: PaymentStatus::Completed,
            amount: 100.0,
            transaction_id,
            timestamp: Utc::now(),
        };
        responder.send(Ok(Some(stored.clone()))).unwrap();

        // 4. Verify Result
        let result = order_task.await.unwrap();
        assert_eq!(result, Ok(stored));
    }

    #[tokio::test]
    async fn test_place_order_unknown_project() {
        let (user_client_inner, mut user_rx) = create_mock_client::<User>(10);
        let (project_client_inner, mut project_rx) = create_mock_client::<Project>(10);
        let (order_client_inner, mut order_rx) = create_mock_client::<Order>(10);

        let order_client = OrderClient::new(
            order_client_inner,
            UserClient::new(user_client_inner),
            ProjectClient::new(project_client_inner),
        );
        let order_task = tokio::spawn(async move { order_client.place_order(7, 99).await });

        let (_, responder) = expect_get(&mut user_rx).await.expect("Expected User Get");
        responder.send(Ok(Some(sample_user(7)))).unwrap();
        let (_, responder) = expect_get(&mut project_rx).await.expect("Expected Project Get");
        responder.send(Ok(None)).unwrap();

        assert_eq!(order_task.await.unwrap(), Err(OrderError::ProjectNotFound(99)));
        // No order was ever requested
        assert!(order_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_swap_archive_returns_previous() {
        let (project_client_inner, mut project_rx) = create_mock_client::<Project>(10);
        let project_client = ProjectClient::new(project_client_inner);

        let swap_task = tokio::spawn(async move {
            project_client.swap_archive(3, "new_b.zip".to_string()).await
        });

        let (project_id, action, responder) =
            expect_action(&mut project_rx).await.expect("Expected Project Action");
        assert_eq!(project_id, 3);
        assert!(matches!(action, ProjectAction::SwapArchive(ref stored) if stored == "new_b.zip"));
        responder
            .send(Ok(ProjectActionResult::ArchiveSwapped {
                previous: "old_a.zip".to_string(),
            }))
            .unwrap();

        assert_eq!(swap_task.await.unwrap(), Ok("old_a.zip".to_string()));
    }

    #[tokio::test]
    async fn test_find_by_email_normalizes_key() {
        let (user_client_inner, mut user_rx) = create_mock_client::<User>(10);
        let user_client = UserClient::new(user_client_inner);

        let find_task = tokio::spawn(async move { user_client.find_by_email("  Buyer@Example.COM ").await });

        let (key, responder) = expect_find_by_key(&mut user_rx).await.expect("Expected FindByKey");
        assert_eq!(key, "buyer@example.com");
        responder.send(Ok(Some(sample_user(7)))).unwrap();

        assert_eq!(find_task.await.unwrap().unwrap().map(|u| u.id), Some(7));
    }

    // -------------------------------------------------------------------------
    // Full system: real actors, temporary upload directory
    // -------------------------------------------------------------------------

    async fn start() -> (TempDir, Config, MarketSystem) {
        let dir = tempdir().unwrap();
        let config = Config::for_tests(dir.path());
        let system = MarketSystem::new(&config).await.unwrap();
        (dir, config, system)
    }

    fn register_input(name: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn register(system: &MarketSystem, email: &str) -> User {
        system
            .auth
            .register(register_input("Student", email, "secret"))
            .await
            .unwrap()
    }

    fn project_input(title: &str, category: &str, branch: &str, price: f64) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            description: format!("{title} description"),
            price,
            category: category.to_string(),
            tech_stack: "Rust, Axum".to_string(),
            branch: branch.to_string(),
        }
    }

    async fn add(system: &MarketSystem, title: &str, category: &str, branch: &str) -> Project {
        system
            .admin
            .add_project(
                project_input(title, category, branch, 100.0),
                Some(Upload::new(format!("{title}.zip"), title.as_bytes().to_vec())),
                None,
            )
            .await
            .unwrap()
    }

    fn stored_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (_dir, _config, system) = start().await;

        register(&system, "a@x.com").await;
        let second = system
            .auth
            .register(register_input("Other", "  A@X.com ", "different"))
            .await;

        assert!(matches!(second, Err(UserError::EmailAlreadyRegistered(_))));
        assert_eq!(system.admin.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (_dir, _config, system) = start().await;
        register(&system, "a@x.com").await;

        let unknown = system
            .auth
            .authenticate(LoginInput {
                email: "nobody@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await;
        let wrong = system
            .auth
            .authenticate(LoginInput {
                email: "a@x.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert_eq!(unknown.unwrap_err(), UserError::InvalidCredentials);
        assert_eq!(wrong.unwrap_err(), UserError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (_dir, _config, system) = start().await;
        let user = register(&system, "a@x.com").await;

        let session = system
            .auth
            .authenticate(LoginInput {
                email: "A@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        let cookie = cookie_value(&session.set_cookie);

        let identity = system.auth.current_identity(Some(&cookie)).await.unwrap();
        assert_eq!(identity.user().map(|u| u.id), Some(user.id));

        let forged = format!("{}0", cookie);
        let anonymous = system.auth.current_identity(Some(&forged)).await.unwrap();
        assert!(matches!(anonymous, Identity::Anonymous));

        system.auth.logout(Some(&cookie)).await.unwrap();
        let after = system.auth.current_identity(Some(&cookie)).await.unwrap();
        assert!(matches!(after, Identity::Anonymous));
    }

    #[tokio::test]
    async fn test_catalog_filter_and_related() {
        let (_dir, _config, system) = start().await;
        let web = add(&system, "Lib System", "Web Development", "Computer Science").await;
        add(&system, "Shop", "Web Development", "Information Technology").await;
        add(&system, "Chat", "Mobile", "Computer Science").await;
        add(&system, "Game", "Web Development", "Mechanical").await;
        add(&system, "Robot", "Embedded", "Electrical").await;
        add(&system, "Blog", "Web Development", "Civil").await;

        let filter = ProjectFilter {
            category: Some("Web Development".to_string()),
            ..ProjectFilter::default()
        };
        let listing = system.catalog.list_projects(&filter).await.unwrap();
        assert_eq!(listing.projects.len(), 4);
        assert!(listing.projects.iter().all(|p| p.category == "Web Development"));
        assert_eq!(listing.categories, vec!["Embedded", "Mobile", "Web Development"]);

        let related = system.catalog.related_projects(&web).await.unwrap();
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|p| p.id != web.id));
        assert!(related.iter().all(|p| p.category == web.category || p.branch == web.branch));

        assert_eq!(
            system.catalog.get_project(999).await,
            Err(ProjectError::NotFound(999))
        );
    }

    #[tokio::test]
    async fn test_purchase_then_download() {
        let (_dir, _config, system) = start().await;
        let project = add(&system, "Lib System", "Web Development", "Computer Science").await;
        let buyer = register(&system, "buyer@x.com").await;
        let other = register(&system, "other@x.com").await;

        let order = system.fulfillment.purchase(&buyer, project.id).await.unwrap();
        assert_eq!(order.amount, project.price);
        assert_eq!(order.payment_status, PaymentStatus::Completed);

        let download = system.fulfillment.download(&buyer, order.id).await.unwrap();
        assert_eq!(download.file_name, "Lib System.zip");
        assert_eq!(download.contents, b"Lib System");

        assert_eq!(
            system.fulfillment.download(&other, order.id).await.unwrap_err(),
            OrderError::NotFound(order.id)
        );
        assert_eq!(
            system.fulfillment.download(&buyer, 424242).await.unwrap_err(),
            OrderError::NotFound(424242)
        );
        assert_eq!(
            system.fulfillment.purchase(&buyer, 999).await.unwrap_err(),
            OrderError::ProjectNotFound(999)
        );
    }

    #[tokio::test]
    async fn test_edit_replaces_archive() {
        let (_dir, config, system) = start().await;
        let project = system
            .admin
            .add_project(
                project_input("Lib System", "Web Development", "Computer Science", 100.0),
                Some(Upload::new("a.zip", &b"archive a"[..])),
                None,
            )
            .await
            .unwrap();
        let old_file = project.file_path.clone();
        let buyer = register(&system, "buyer@x.com").await;
        let order = system.fulfillment.purchase(&buyer, project.id).await.unwrap();

        let edited = system
            .admin
            .edit_project(
                project.id,
                project_input("Lib System", "Web Development", "Computer Science", 150.0),
                Some(Upload::new("b.zip", &b"archive b"[..])),
                None,
            )
            .await
            .unwrap();

        assert_ne!(edited.file_path, old_file);
        assert!(edited.file_path.ends_with("_b.zip"));
        assert_eq!(edited.price, 150.0);
        assert!(!config.upload_dir.join(&old_file).exists());
        assert!(config.upload_dir.join(&edited.file_path).exists());

        let download = system.fulfillment.download(&buyer, order.id).await.unwrap();
        assert_eq!(download.contents, b"archive b");
        // The order keeps the price it was bought at
        assert_eq!(order.amount, 100.0);
    }

    #[tokio::test]
    async fn test_edit_replaces_preview() {
        let (_dir, config, system) = start().await;
        let project = system
            .admin
            .add_project(
                project_input("Lib System", "Web Development", "Computer Science", 100.0),
                Some(Upload::new("a.zip", &b"archive a"[..])),
                Some(Upload::new("old.png", &b"old png"[..])),
            )
            .await
            .unwrap();
        let old_preview = project.preview_image.clone().unwrap();

        let edited = system
            .admin
            .edit_project(
                project.id,
                project_input("Lib System", "Web Development", "Computer Science", 100.0),
                None,
                Some(Upload::new("new.png", &b"new png"[..])),
            )
            .await
            .unwrap();

        let new_preview = edited.preview_image.clone().unwrap();
        assert_ne!(new_preview, old_preview);
        assert!(new_preview.starts_with("preview_"));
        assert!(new_preview.ends_with("_new.png"));
        assert!(!config.upload_dir.join(&old_preview).exists());
        assert!(config.upload_dir.join(&new_preview).exists());

        // The archive is untouched
        assert_eq!(edited.file_path, project.file_path);
        assert!(config.upload_dir.join(&project.file_path).exists());
        assert_eq!(stored_files(&config.upload_dir), 2);
    }

    #[tokio::test]
    async fn test_edit_without_files_keeps_them() {
        let (_dir, config, system) = start().await;
        let project = system
            .admin
            .add_project(
                project_input("Lib System", "Web Development", "Computer Science", 100.0),
                Some(Upload::new("a.zip", &b"a"[..])),
                Some(Upload::new("shot.png", &b"png"[..])),
            )
            .await
            .unwrap();

        let edited = system
            .admin
            .edit_project(
                project.id,
                project_input("Library System", "Web Development", "Computer Science", 100.0),
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(edited.title, "Library System");
        assert_eq!(edited.file_path, project.file_path);
        assert_eq!(edited.preview_image, project.preview_image);
        assert_eq!(stored_files(&config.upload_dir), 2);

        assert_eq!(
            system
                .admin
                .edit_project(999, project_input("X", "Y", "Z", 1.0), None, None)
                .await
                .unwrap_err(),
            ProjectError::NotFound(999)
        );
    }

    #[tokio::test]
    async fn test_delete_removes_files() {
        let (_dir, config, system) = start().await;
        let with_preview = system
            .admin
            .add_project(
                project_input("Lib System", "Web Development", "Computer Science", 100.0),
                Some(Upload::new("a.zip", &b"a"[..])),
                Some(Upload::new("shot.png", &b"png"[..])),
            )
            .await
            .unwrap();
        let without_preview = add(&system, "Shop", "Web Development", "Computer Science").await;
        assert_eq!(stored_files(&config.upload_dir), 3);

        system.admin.delete_project(with_preview.id).await.unwrap();
        assert_eq!(stored_files(&config.upload_dir), 1);
        assert_eq!(
            system.admin.delete_project(with_preview.id).await,
            Err(ProjectError::NotFound(with_preview.id))
        );

        system.admin.delete_project(without_preview.id).await.unwrap();
        assert_eq!(stored_files(&config.upload_dir), 0);
        assert!(system.admin.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_refused_while_ordered() {
        let (_dir, config, system) = start().await;
        let project = add(&system, "Lib System", "Web Development", "Computer Science").await;
        let buyer = register(&system, "buyer@x.com").await;
        system.fulfillment.purchase(&buyer, project.id).await.unwrap();

        assert_eq!(
            system.admin.delete_project(project.id).await,
            Err(ProjectError::HasOrders { id: project.id, orders: 1 })
        );
        assert!(config.upload_dir.join(&project.file_path).exists());
    }

    #[tokio::test]
    async fn test_add_without_archive_or_with_bad_fields() {
        let (_dir, config, system) = start().await;

        let missing = system
            .admin
            .add_project(
                project_input("Lib System", "Web Development", "Computer Science", 100.0),
                None,
                Some(Upload::new("shot.png", &b"png"[..])),
            )
            .await;
        assert_eq!(missing, Err(ProjectError::MissingFile));

        let blank = system
            .admin
            .add_project(
                project_input("   ", "Web Development", "Computer Science", 100.0),
                Some(Upload::new("a.zip", &b"a"[..])),
                None,
            )
            .await;
        assert!(matches!(blank, Err(ProjectError::ValidationError(_))));

        let disallowed = system
            .admin
            .add_project(
                project_input("Lib System", "Web Development", "Computer Science", 100.0),
                Some(Upload::new("a.zip", &b"a"[..])),
                Some(Upload::new("shot.exe", &b"x"[..])),
            )
            .await;
        assert!(matches!(disallowed, Err(ProjectError::FileStore(_))));

        assert_eq!(stored_files(&config.upload_dir), 0);
        assert!(system.admin.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_engagement_and_dashboard() {
        let (_dir, _config, system) = start().await;
        let project = add(&system, "Lib System", "Web Development", "Computer Science").await;

        let missing = system
            .engagement
            .submit_inquiry(
                999,
                InquiryInput {
                    name: "Ann".to_string(),
                    email: "ann@x.com".to_string(),
                    phone: None,
                    message: None,
                },
            )
            .await;
        assert_eq!(missing, Err(InquiryError::ProjectNotFound(999)));

        for n in 0..6 {
            let inquiry = system
                .engagement
                .submit_inquiry(
                    project.id,
                    InquiryInput {
                        name: format!("Ann {n}"),
                        email: "ann@x.com".to_string(),
                        phone: Some(" ".to_string()),
                        message: Some("Is it documented?".to_string()),
                    },
                )
                .await
                .unwrap();
            assert_eq!(inquiry.status, InquiryStatus::New);
            assert_eq!(inquiry.phone, None);
        }

        system
            .engagement
            .submit_contact(ContactInput {
                name: "Bob".to_string(),
                email: "bob@x.com".to_string(),
                subject: "Hello".to_string(),
                message: "Custom project?".to_string(),
            })
            .await
            .unwrap();

        let dashboard = system.admin.dashboard().await.unwrap();
        assert_eq!(dashboard.total_projects, 1);
        assert_eq!(dashboard.total_inquiries, 6);
        assert_eq!(dashboard.total_contacts, 1);
        assert_eq!(dashboard.recent_inquiries.len(), 5);
        assert_eq!(dashboard.recent_inquiries[0].name, "Ann 5");
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent_and_samples_have_no_archive() {
        let (_dir, config, system) = start().await;
        bootstrap(&system, &config).await.unwrap();
        bootstrap(&system, &config).await.unwrap();

        let users = system.admin.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_admin);
        let projects = system.admin.list_projects().await.unwrap();
        assert_eq!(projects.len(), 3);

        let buyer = register(&system, "buyer@x.com").await;
        let order = system.fulfillment.purchase(&buyer, projects[0].id).await.unwrap();
        assert!(matches!(
            system.fulfillment.download(&buyer, order.id).await,
            Err(OrderError::FileMissing(_))
        ));
    }

    #[tokio::test]
    async fn test_records_survive_restart() {
        let (_dir, config, system) = start().await;
        let project = add(&system, "Lib System", "Web Development", "Computer Science").await;
        let dropped = add(&system, "Shop", "Web Development", "Computer Science").await;
        system.admin.delete_project(dropped.id).await.unwrap();
        let buyer = register(&system, "buyer@x.com").await;
        let order = system.fulfillment.purchase(&buyer, project.id).await.unwrap();
        let first = system
            .auth
            .authenticate(LoginInput {
                email: "buyer@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        let cookie = cookie_value(&first.set_cookie);
        system.shutdown().await.unwrap();

        let system = MarketSystem::new(&config).await.unwrap();

        let projects = system.admin.list_projects().await.unwrap();
        assert_eq!(projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![project.id]);
        assert_eq!(projects[0].file_path, project.file_path);

        // Password hashes and sessions come back with their users
        let identity = system.auth.current_identity(Some(&cookie)).await.unwrap();
        assert_eq!(identity.user().map(|u| u.id), Some(buyer.id));
        let again = system
            .auth
            .authenticate(LoginInput {
                email: "buyer@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(again.user.id, buyer.id);

        let download = system.fulfillment.download(&again.user, order.id).await.unwrap();
        assert_eq!(download.contents, b"Lib System");
        assert_eq!(
            system.admin.delete_project(project.id).await,
            Err(ProjectError::HasOrders { id: project.id, orders: 1 })
        );

        // Ids of deleted records are not reused
        let next = add(&system, "Chat", "Mobile", "Computer Science").await;
        assert_eq!(next.id, dropped.id + 1);
    }

    #[tokio::test]
    async fn test_expired_session_is_anonymous() {
        let dir = tempdir().unwrap();
        let config = Config {
            session_max_age_hours: 0,
            ..Config::for_tests(dir.path())
        };
        let system = MarketSystem::new(&config).await.unwrap();
        register(&system, "a@x.com").await;

        let session = system
            .auth
            .authenticate(LoginInput {
                email: "a@x.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        let cookie = cookie_value(&session.set_cookie);

        let identity = system.auth.current_identity(Some(&cookie)).await.unwrap();
        assert!(matches!(identity, Identity::Anonymous));
    }

    #[tokio::test]
    async fn test_system_shutdown() {
        let (_dir, _config, system) = start().await;
        assert!(system.shutdown().await.is_ok());
    }

    // -------------------------------------------------------------------------
    // HTTP surface
    // -------------------------------------------------------------------------

    /// `name=value` from a `Set-Cookie` header.
    fn cookie_value(set_cookie: &str) -> String {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        pair.split_once('=').map(|(_, v)| v.to_string()).unwrap_or_default()
    }

    async fn start_router() -> (TempDir, MarketSystem, Router) {
        let (dir, config, system) = start().await;
        bootstrap(&system, &config).await.unwrap();
        let router = build_router(AppState::from_system(&system), &config);
        (dir, system, router)
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = cookie {
            builder = builder.header(header::COOKIE, format!("market_session={value}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    async fn login(router: &Router, email: &str, password: &str) -> String {
        let response = router
            .clone()
            .oneshot(form("/login", &format!("email={email}&password={password}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        cookie_value(set_cookie)
    }

    async fn admin_cookie(router: &Router) -> String {
        let email = DEFAULT_ADMIN_EMAIL.replace('@', "%40");
        login(router, &email, DEFAULT_ADMIN_PASSWORD).await
    }

    #[tokio::test]
    async fn test_guards_redirect_to_login() {
        let (_dir, _system, router) = start_router().await;

        let response = router.clone().oneshot(get("/download/1", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Fdownload%2F1");

        let response = router.clone().oneshot(get("/admin/users", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Fadmin%2Fusers");
    }

    #[tokio::test]
    async fn test_register_login_and_admin_gate() {
        let (_dir, _system, router) = start_router().await;

        let response = router
            .clone()
            .oneshot(form("/register", "name=Ann&email=ann%40x.com&password=secret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let duplicate = router
            .clone()
            .oneshot(form("/register", "name=Ann&email=ANN%40x.com&password=other"))
            .await
            .unwrap();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let bad = router
            .clone()
            .oneshot(form("/login", "email=ann%40x.com&password=nope"))
            .await
            .unwrap();
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

        let response = router
            .clone()
            .oneshot(form("/login?next=/projects", "email=ann%40x.com&password=secret"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/projects");

        // A student is not an admin
        let cookie = login(&router, "ann%40x.com", "secret").await;
        let response = router.clone().oneshot(get("/admin", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // ...and is bounced off the login page once signed in
        let response = router.clone().oneshot(get("/login", Some(&cookie))).await.unwrap();
        assert_eq!(location(&response), "/");

        let admin = admin_cookie(&router).await;
        let response = router.clone().oneshot(get("/admin", Some(&admin))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let dashboard: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(dashboard["total_projects"], 3);

        let response = router.clone().oneshot(get("/admin/users", Some(&admin))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let users: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let users = users.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.get("password_hash").is_none()));
    }

    #[tokio::test]
    async fn test_public_pages() {
        let (_dir, _system, router) = start_router().await;

        let response = router.clone().oneshot(get("/signup", None)).await.unwrap();
        assert_eq!(location(&response), "/register");

        let response = router.clone().oneshot(get("/project/999", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(error["error"].is_string());

        let response = router
            .clone()
            .oneshot(get("/projects?category=Desktop+Application&min_price=", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let listing: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(listing["projects"].as_array().map(Vec::len), Some(1));

        let response = router
            .clone()
            .oneshot(form("/inquiry/1", "name=Ann&email=ann%40x.com"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/project/1");

        let response = router
            .clone()
            .oneshot(form("/contact", "name=Bob&email=bob%40x.com&subject=Hi&message=Hello"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/contact");
    }

    #[tokio::test]
    async fn test_admin_upload_then_buy_and_download() {
        let (_dir, _system, router) = start_router().await;
        let admin = admin_cookie(&router).await;

        let boundary = "XBOUNDARYX";
        let text = |name: &str, value: &str| {
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
        };
        let mut body = String::new();
        body.push_str(&text("title", "Lib System"));
        body.push_str(&text("description", "Library management"));
        body.push_str(&text("price", "100"));
        body.push_str(&text("category", "Web Development"));
        body.push_str(&text("tech_stack", "Rust, Axum"));
        body.push_str(&text("branch", "Computer Science"));
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"project_file\"; filename=\"a.zip\"\r\nContent-Type: application/zip\r\n\r\nPK archive\r\n"
        ));
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"preview_image\"; filename=\"\"\r\nContent-Type: application/octet-stream\r\n\r\n\r\n"
        ));
        body.push_str(&format!("--{boundary}--\r\n"));

        let request = Request::builder()
            .method("POST")
            .uri("/admin/projects/add")
            .header(header::COOKIE, format!("market_session={admin}"))
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/projects");

        // Three samples come first, so the upload is project 4
        router
            .clone()
            .oneshot(form("/register", "name=Ann&email=ann%40x.com&password=secret"))
            .await
            .unwrap();
        let cookie = login(&router, "ann%40x.com", "secret").await;

        let buy = Request::builder()
            .method("POST")
            .uri("/buy/4")
            .header(header::COOKIE, format!("market_session={cookie}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(buy).await.unwrap();
        assert_eq!(location(&response), "/project/4");

        let response = router.clone().oneshot(get("/download/1", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"Lib System.zip\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"PK archive");

        // Purchased projects cannot be deleted
        let response = router
            .clone()
            .oneshot(get("/admin/projects/delete/4", Some(&admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_uploads_served_and_traversal_refused() {
        let (_dir, system, router) = start_router().await;
        let project = system
            .admin
            .add_project(
                project_input("Lib System", "Web Development", "Computer Science", 100.0),
                Some(Upload::new("a.zip", &b"archive"[..])),
                Some(Upload::new("shot.png", &b"png bytes"[..])),
            )
            .await
            .unwrap();
        let preview = project.preview_image.unwrap();

        let response = router
            .clone()
            .oneshot(get(&format!("/uploads/{preview}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"png bytes");

        // The record tables sit next to the upload directory
        for uri in [
            "/uploads/../data/users.json",
            "/uploads/..%2Fdata%2Fusers.json",
            "/uploads/%2e%2e/data/users.json",
        ] {
            let response = router.clone().oneshot(get(uri, None)).await.unwrap();
            assert_ne!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_download_of_sample_reports_missing_file() {
        let (_dir, _system, router) = start_router().await;
        router
            .clone()
            .oneshot(form("/register", "name=Ann&email=ann%40x.com&password=secret"))
            .await
            .unwrap();
        let cookie = login(&router, "ann%40x.com", "secret").await;

        let buy = Request::builder()
            .method("POST")
            .uri("/buy/1")
            .header(header::COOKIE, format!("market_session={cookie}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(buy).await.unwrap();
        assert_eq!(location(&response), "/project/1");

        let response = router.clone().oneshot(get("/download/1", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(error["error"].is_string());
    }
}
