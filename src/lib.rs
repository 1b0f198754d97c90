//! Deploy a git repository into a work directory when an authenticated webhook arrives.
//!
//! ## How it works
//!
//! `deploy-hook` is built up from **triggers** and a **deployment**.
//! Triggers are long running background processes that initiate deployments
//! (for example an HTTP server waiting for webhooks with a secret key). Every trigger
//! starts one deployment, which fetches the remote and updates the work directory
//! with git, writing each step to the deploy log. After the update an optional
//! post-deploy hook runs (e.g. user-defined commands).
//!
//! ```ignore
//! +---------+       +------------+       +------+
//! | trigger | ----> | deployment | ----> | hook |
//! +---------+       +------------+       +------+
//! ```
//!
//! The deployment works in two modes. If the repository has its own working tree, it
//! is pulled in place. If the repository is a mirror and there is a separate work
//! directory, the branch is force checked out into it.
//!

/// The context which can share data between the different steps.
pub mod context;
/// A deployment updates a work directory from the remote (e.g. [with git](deploy::DeploymentRunner)).
pub mod deploy;
/// Run git commands without a shell.
pub mod git;
/// A hook is something that runs after a successful update (e.g. [running commands](hooks::script::ScriptHook)).
pub mod hooks;
/// The timestamped deploy log.
pub mod journal;
/// A trigger is a long running background process, which initiates the deployments
/// (e.g. [on HTTP request](triggers::http::HttpTrigger) or [once](triggers::once::OnceTrigger)).
pub mod triggers;

/// The main program loop, that runs the triggers and the deployments.
pub mod start;
