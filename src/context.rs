use std::collections::HashMap;

/// Data collected along the way from the trigger to the deployment, e.g. which trigger
/// fired or which directories were deployed. Post-deploy hooks receive it as environment variables.
pub type Context = HashMap<String, String>;
