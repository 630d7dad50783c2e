use super::*;

impl UserService {
    /// Authenticates a user with email and password.
    ///
    /// Unknown emails still pay for one hash so that response time does not
    /// reveal whether an account exists.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let Ok(email) = EmailAddress::new(email) else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let Some(user) = self.user_repository.find_by_email(email.as_str()).await? else {
            let _ = self.password_hasher.hash_password(password);
            info!("login failed for unknown email");
            return Ok(AuthOutcome::Failed);
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            info!(user_id = %user.id, "login failed: invalid password");
            return Ok(AuthOutcome::Failed);
        }

        info!(user_id = %user.id, "login succeeded");
        Ok(AuthOutcome::Authenticated(user))
    }
}
