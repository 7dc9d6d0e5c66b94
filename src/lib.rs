pub mod helpers {
    /// Process start-up shared by all binaries: panic hook, `.env`, logging.
    pub mod bootstrap;
    pub mod logging;
}
