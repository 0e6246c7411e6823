//! Auth pages and the account settings page.

use async_trait::async_trait;
use auth_sdk::OAuthService;
use modkit::{Component, LangBundle, RenderCtx, View, escape_html, page};

pub fn login(ctx: &RenderCtx<'_>) -> View {
    let body = format!(
        r#"<form method="post" action="/auth/login">{fields}<button type="submit">{submit}</button></form>
<p class="oauth"><a href="/auth/oauth/google">Google</a> <a href="/auth/oauth/apple">Apple</a> <a href="/auth/oauth/microsoft">Microsoft</a></p>
<p><a href="/auth/register">{register}</a> | <a href="/auth/reset-password">{forgot}</a></p>"#,
        fields = credential_fields(ctx),
        submit = escape_html(ctx.t("auth:login.submit")),
        register = escape_html(ctx.t("auth:login.register")),
        forgot = escape_html(ctx.t("auth:login.forgot")),
    );
    page(ctx.t("auth:login.title"), &body)
}

pub fn register(ctx: &RenderCtx<'_>) -> View {
    let body = format!(
        r#"<form method="post" action="/auth/register">{fields}<button type="submit">{submit}</button></form>
<p><a href="/auth/login">{login}</a></p>"#,
        fields = credential_fields(ctx),
        submit = escape_html(ctx.t("auth:register.submit")),
        login = escape_html(ctx.t("auth:register.login")),
    );
    page(ctx.t("auth:register.title"), &body)
}

pub fn reset_password(ctx: &RenderCtx<'_>) -> View {
    let body = format!(
        r#"<form method="post" action="/auth/reset-password"><label>{email} <input type="email" name="email" required></label><button type="submit">{submit}</button></form>"#,
        email = escape_html(ctx.t("auth:field.email")),
        submit = escape_html(ctx.t("auth:reset.submit")),
    );
    page(ctx.t("auth:reset.title"), &body)
}

pub fn account(ctx: &RenderCtx<'_>) -> View {
    let email = ctx.security.map(|s| s.email()).unwrap_or_default();
    let body = format!(
        r#"<form method="post" action="/settings/account"><label>{email_label} <input type="email" name="email" value="{email}"></label><label>{password_label} <input type="password" name="password"></label><button type="submit">{submit}</button></form>
<form method="post" action="/auth/logout"><button type="submit">{logout}</button></form>"#,
        email_label = escape_html(ctx.t("auth:field.email")),
        email = escape_html(email),
        password_label = escape_html(ctx.t("auth:account.new_password")),
        submit = escape_html(ctx.t("auth:account.submit")),
        logout = escape_html(ctx.t("auth:account.logout")),
    );
    page(ctx.t("auth:account.title"), &body)
}

/// `/auth/confirm-email?code=...`
pub struct ConfirmEmail;

#[async_trait]
impl Component for ConfirmEmail {
    async fn render(&self, ctx: &RenderCtx<'_>) -> View {
        let title = ctx.t("auth:confirm.title");
        let Some(code) = ctx.query.get("code") else {
            return page(title, &paragraph(ctx.t("auth:confirm.missing")));
        };
        let auth = match ctx.components().require_service::<OAuthService>() {
            Ok(auth) => auth,
            Err(err) => {
                tracing::error!(error = %err, "confirm-email page without auth service");
                ctx.notifier.error(&err.to_string());
                return page(title, &paragraph(ctx.t("auth:confirm.failed")));
            }
        };

        match auth.confirm_email(code).await {
            Ok(user) => {
                ctx.notifier.success(ctx.t("auth:confirm.done"));
                page(title, &paragraph(&user.email))
            }
            Err(err) => {
                ctx.notifier.error(&err.to_string());
                page(title, &paragraph(ctx.t("auth:confirm.failed")))
            }
        }
    }
}

fn credential_fields(ctx: &RenderCtx<'_>) -> String {
    format!(
        r#"<label>{email} <input type="email" name="email" required></label><label>{password} <input type="password" name="password" required></label>"#,
        email = escape_html(ctx.t("auth:field.email")),
        password = escape_html(ctx.t("auth:field.password")),
    )
}

fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text))
}

pub fn lang_bundle() -> LangBundle {
    LangBundle::new()
        .locale(
            "en",
            [
                ("login.title", "Sign in"),
                ("login.submit", "Sign in"),
                ("login.register", "Create an account"),
                ("login.forgot", "Forgot your password?"),
                ("register.title", "Create an account"),
                ("register.submit", "Sign up"),
                ("register.login", "Already registered? Sign in"),
                ("reset.title", "Reset password"),
                ("reset.submit", "Send reset link"),
                ("reset.sent", "If the address is registered, a reset link is on its way"),
                ("field.email", "Email"),
                ("field.password", "Password"),
                ("confirm.title", "Email confirmation"),
                ("confirm.missing", "The confirmation link is incomplete"),
                ("confirm.failed", "The confirmation link is invalid or expired"),
                ("confirm.done", "Email confirmed"),
                ("account.title", "Account"),
                ("account.new_password", "New password"),
                ("account.submit", "Save"),
                ("account.saved", "Account updated"),
                ("account.logout", "Sign out"),
                ("menu.account", "Account"),
            ],
        )
        .locale(
            "fr",
            [
                ("login.title", "Connexion"),
                ("login.submit", "Se connecter"),
                ("login.register", "Cr\u{e9}er un compte"),
                ("login.forgot", "Mot de passe oubli\u{e9} ?"),
                ("register.title", "Cr\u{e9}er un compte"),
                ("register.submit", "S'inscrire"),
                ("field.email", "E-mail"),
                ("field.password", "Mot de passe"),
                ("account.title", "Compte"),
                ("account.logout", "Se d\u{e9}connecter"),
                ("menu.account", "Compte"),
            ],
        )
}
