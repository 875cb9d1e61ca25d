use crate::user::Profile;
use actix_session::Session;
use actix_web::dev::{
    self, Extensions, Payload, Service, ServiceRequest, ServiceResponse, Transform,
};
use actix_web::{web::Data, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Client data stored for a single request cycle.
/// Distinct from ClientCtx because it is defined through request data.
#[derive(Clone, Debug)]
pub struct ClientCtxInner {
    /// User data. Optional. None is a guest user.
    pub client: Option<Profile>,
    /// Randomly generated string for CSP.
    pub nonce: String,
    /// CSRF token for form protection
    pub csrf_token: String,
    /// Unread notification count for the user
    pub unread_notifications: i64,
    /// Time the request started for page load statistics.
    pub request_start: Instant,
}

impl Default for ClientCtxInner {
    fn default() -> Self {
        Self {
            client: None,
            nonce: Self::nonce(),
            csrf_token: String::new(), // Will be populated from session
            unread_notifications: 0,
            request_start: Instant::now(),
        }
    }
}

impl ClientCtxInner {
    pub async fn from_session(session: &Session) -> Self {
        use crate::middleware::csrf::get_or_create_csrf_token;
        use crate::session::authenticate_client_by_session;

        let client = authenticate_client_by_session(session).await;

        // Get or create CSRF token for this session
        let csrf_token = get_or_create_csrf_token(session).unwrap_or_else(|_| String::new());

        // Get unread notification count for logged-in users
        let unread_notifications = if let Some(ref user) = client {
            crate::notifications::count_unread_notifications(user.id)
                .await
                .unwrap_or(0)
        } else {
            0
        };

        ClientCtxInner {
            client,
            csrf_token,
            unread_notifications,
            ..Default::default()
        }
    }

    /// Returns a hash unique to each request used for CSP.
    /// See: <https://developer.mozilla.org/en-US/docs/Web/HTTP/CSP>
    pub fn nonce() -> String {
        let mut hasher = blake3::Hasher::new();

        // Hash: Salt
        match std::env::var("SALT") {
            Ok(v) => hasher.update(v.as_bytes()),
            Err(_) => hasher.update("NO_SALT_FOR_NONCE".as_bytes()),
        };

        // Hash: Timestamp
        use std::time::{SystemTime, UNIX_EPOCH};
        hasher.update(
            &SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("System clock before 1970. Really?")
                .as_millis()
                .to_ne_bytes(),
        );
        hasher.finalize().to_string()
    }
}

/// Client context passed to routes.
/// Wraps ClientCtxInner, which is set at the beginning of the request.
#[derive(Clone, Debug)]
pub struct ClientCtx(Data<ClientCtxInner>);

impl Default for ClientCtx {
    fn default() -> Self {
        Self(Data::new(ClientCtxInner::default()))
    }
}

impl ClientCtx {
    /// Returns instance of Self with components required for ClientCtxInner.
    pub async fn from_session(session: &Session) -> Self {
        Self(Data::new(ClientCtxInner::from_session(session).await))
    }

    fn get_or_default_from_extensions(extensions: &mut Extensions) -> Self {
        match extensions.get::<Data<ClientCtxInner>>() {
            // Existing record in extensions; pull it and return clone.
            Some(cbox) => Self(cbox.clone()),
            // No existing record; create and insert it.
            None => {
                let cbox = Data::new(ClientCtxInner::default());
                extensions.insert(cbox.clone());
                Self(cbox)
            }
        }
    }

    /// Returns either the user's id or None.
    pub fn get_id(&self) -> Option<i32> {
        self.0.client.as_ref().map(|u| u.id)
    }

    /// Returns either the user's name or the word for guest.
    pub fn get_name(&self) -> String {
        match &self.0.client {
            Some(user) => user.username.to_owned(),
            None => "Guest".to_owned(),
        }
    }

    pub fn get_user(&self) -> Option<&Profile> {
        self.0.client.as_ref()
    }

    pub fn get_csrf_token(&self) -> &str {
        &self.0.csrf_token
    }

    pub fn get_unread_notifications(&self) -> i64 {
        self.0.unread_notifications
    }

    pub fn is_user(&self) -> bool {
        self.0.client.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.0.client.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }

    pub fn get_nonce(&self) -> &String {
        &self.0.nonce
    }

    /// Returns Duration representing request time.
    pub fn request_time(&self) -> Duration {
        Instant::now() - self.0.request_start
    }

    /// Returns human readable representing request time.
    pub fn request_time_as_string(&self) -> String {
        let us = self.request_time().as_micros();
        if us > 5000 {
            format!("{}ms", us / 1000)
        } else {
            format!("{}us", us)
        }
    }

    /// Require user to be logged in. Returns user_id or ErrorUnauthorized.
    pub fn require_login(&self) -> Result<i32, actix_web::Error> {
        self.get_id()
            .ok_or_else(|| actix_web::error::ErrorUnauthorized("Login required"))
    }

    /// Require an administrator. Returns user_id or an error.
    pub fn require_admin(&self) -> Result<i32, actix_web::Error> {
        let user_id = self.require_login()?;
        if !self.is_admin() {
            return Err(actix_web::error::ErrorForbidden("Admin access required"));
        }
        Ok(user_id)
    }

    /// Require ownership of a resource. Returns () or ErrorForbidden.
    pub fn require_ownership(&self, resource_user_id: i32) -> Result<(), actix_web::Error> {
        let user_id = self.require_login()?;

        if user_id != resource_user_id {
            return Err(actix_web::error::ErrorForbidden(
                "You don't own this resource",
            ));
        }
        Ok(())
    }
}

/// This implementation is what actually provides the `client: ClientCtx` in the parameters of route functions.
impl FromRequest for ClientCtx {
    /// The associated error which can be returned.
    type Error = Error;
    /// Future that resolves to a Self.
    type Future = Ready<Result<Self, Self::Error>>;

    /// Create a Self from request parts asynchronously.
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(ClientCtx::get_or_default_from_extensions(
            &mut req.extensions_mut(),
        )))
    }
}

impl<S: 'static, B> Transform<S, ServiceRequest> for ClientCtx
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ClientCtxMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ClientCtxMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Client context middleware
pub struct ClientCtxMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ClientCtxMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();

        // Borrows of `req` must be done in a precise way to avoid conflicts. This order is important.
        let (httpreq, payload) = req.into_parts();
        let session = Session::extract(&httpreq).into_inner();
        let req = ServiceRequest::from_parts(httpreq, payload);

        Box::pin(async move {
            match session {
                Ok(session) => {
                    req.extensions_mut()
                        .insert(Data::new(ClientCtxInner::from_session(&session).await));
                }
                Err(err) => {
                    log::error!("Unable to extract Session data in middleware: {}", err);
                }
            };

            svc.call(req).await
        })
    }
}
