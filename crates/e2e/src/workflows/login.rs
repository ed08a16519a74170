use tracing::info;

use crate::data::Credentials;
use crate::error::E2eResult;
use crate::pages::LoginPage;
use crate::session::Driver;

pub struct LoginWorkflow<'a, D: Driver + ?Sized> {
    page: LoginPage<'a, D>,
}

impl<'a, D: Driver + ?Sized> LoginWorkflow<'a, D> {
    pub fn new(driver: &'a D, base_url: &'a str) -> Self {
        Self {
            page: LoginPage::new(driver, base_url),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> E2eResult<()> {
        info!("Logging in as {}", credentials.email);
        self.page.open_login_page().await?;
        self.page.login(&credentials.email, &credentials.password).await
    }

    pub async fn logout(&self) -> E2eResult<()> {
        info!("Logging out");
        self.page.logout().await
    }
}
