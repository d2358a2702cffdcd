use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::registry::ActivityRegistry;

/// Name of the single action the capability may invoke.
pub const LOG_ACTIVITY_ACTION: &str = "logActivity";

/// Builds the system preamble for one capability invocation: today's date, the
/// names the model may match against, and the extraction rules.
pub fn system_instruction(today: NaiveDate, registry: &ActivityRegistry) -> String {
    let activity_names = registry.names().join(", ");
    format!(
        "You are an intelligent diary assistant. Your goal is to help the user log their activities.\n\
The current date is {today}.\n\
Here is the list of available activities the user can log time for: {activity_names}.\n\
\n\
When the user describes what they did, identify the activity, the duration, and the date.\n\
- The date can be relative like 'today' or 'yesterday'.\n\
- The duration is a number, typically in hours.\n\
- You must match the user's description to one of the available activities.\n\
\n\
If you have all the necessary information (activity name, duration, date), call the '{LOG_ACTIVITY_ACTION}' function.\n\
If any information is missing, ask the user a clear question to get the missing details. For example, if the duration is missing, ask 'How long did you spend on that?'.\n\
Once an activity is logged, confirm it with the user in a friendly message."
    )
}

/// Declaration of the `logActivity` action, in the JSON schema shape the
/// capability advertises to its model.
pub fn log_activity_schema() -> Value {
    json!({
        "name": LOG_ACTIVITY_ACTION,
        "description": "Logs an activity with its duration and date.",
        "parameters": {
            "type": "object",
            "properties": {
                "activityName": {
                    "type": "string",
                    "description": "The name of the activity to log. Must be one of the provided activity names.",
                },
                "duration": {
                    "type": "number",
                    "description": "The duration spent on the activity. The unit is assumed to be what is defined for the activity (e.g., hours).",
                },
                "date": {
                    "type": "string",
                    "description": "The date the activity was performed, in YYYY-MM-DD format.",
                },
            },
            "required": ["activityName", "duration", "date"],
        },
    })
}
