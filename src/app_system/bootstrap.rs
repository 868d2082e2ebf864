//! First-run setup: the admin account and a starter catalog.

use tracing::{info, warn};
use crate::app_system::{AppError, Config, MarketSystem, DEFAULT_ADMIN_PASSWORD};
use crate::domain::{ProjectCreate, ProjectFields};

/// Sample listings. Their archives are not shipped, so downloading one
/// reports a missing file.
pub fn sample_listings() -> Vec<ProjectCreate> {
    let listing = |title: &str, description: &str, price: f64, file: &str, category: &str, tech: &str, branch: &str| {
        ProjectCreate {
            fields: ProjectFields {
                title: title.to_string(),
                description: description.to_string(),
                price,
                category: category.to_string(),
                tech_stack: tech.to_string(),
                branch: branch.to_string(),
            },
            file_path: file.to_string(),
            preview_image: None,
        }
    };

    vec![
        listing(
            "Student Management System",
            "A web-based student management system with student registration, course management, attendance tracking, and grade management.",
            299.0,
            "sample_project_1.zip",
            "Web Development",
            "HTML, CSS, JavaScript, PHP, MySQL",
            "Computer Science",
        ),
        listing(
            "E-Commerce Platform",
            "A full-featured e-commerce platform with user authentication, product catalog, shopping cart, payment integration, and admin panel.",
            399.0,
            "sample_project_2.zip",
            "Web Development",
            "React.js, Node.js, Express.js, MongoDB",
            "Computer Science",
        ),
        listing(
            "Inventory Management System",
            "An inventory management system with barcode scanning, stock tracking, supplier management, and detailed reporting.",
            249.0,
            "sample_project_3.zip",
            "Desktop Application",
            "Java, Swing, MySQL",
            "Information Technology",
        ),
    ]
}

pub async fn bootstrap(system: &MarketSystem, config: &Config) -> Result<(), AppError> {
    if system
        .auth
        .ensure_admin(&config.admin_email, &config.admin_password)
        .await?
    {
        info!(email = %config.admin_email, "Bootstrap admin created");
        if config.admin_password == DEFAULT_ADMIN_PASSWORD {
            warn!("Admin is using the default password; change it before deploying");
        }
    }

    system.admin.seed_catalog(sample_listings()).await?;
    Ok(())
}
