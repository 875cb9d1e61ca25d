pub mod admin;
pub mod error;
pub mod flags;
pub mod index;
pub mod login;
pub mod logout;
pub mod member;
pub mod notifications;
pub mod post;
pub mod search;
pub mod votes;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Descending order. Order is important.
    // Route resolution will stop at the first match.
    index::configure(conf);
    admin::configure(conf);
    flags::configure(conf);
    login::configure(conf);
    logout::configure(conf);
    member::configure(conf);
    notifications::configure(conf);
    post::configure(conf);
    search::configure(conf);
    votes::configure(conf);

    conf.service(crate::create_user::create_user_get)
        .service(crate::create_user::create_user_post);
}
