//! Status comment rendering with `minijinja` templates.
//!
//! The comment starts with a hidden marker so later runs can find and
//! replace it. Tables are rendered to Markdown before they reach the
//! templates.

use minijinja::{AutoEscape, Environment, context};

use crate::github::IntakeError;

use super::classify::{ClassifiedFile, Warning};
use super::overview::StatusOverview;
use super::table::markdown_table;

/// Hidden HTML comment identifying the status comment.
pub const COMMENT_MARKER: &str = "<!-- lunaria-status-overview -->";

const BODY_TEMPLATE: &str = "{{ marker }}
## Lunaria Status Overview
{{ overview }}

{{ tracked_files }}";

const TRACKED_OVERVIEW: &str = "
🌕 **This pull request will trigger status changes.**

<details>
<summary>Learn more</summary>

By default, every PR changing files present in the [Lunaria configuration's `files` property](https://lunaria.dev/reference/configuration/#files-required) will be considered and trigger status changes accordingly.

You can change this by adding one of the keywords present in the [`ignoreKeywords` property in your Lunaria configuration file](https://lunaria.dev/reference/configuration/#ignorekeywords) in the PR's title (ignoring all files) or by [including a tracker directive](https://lunaria.dev/guides/tracking/#tracker-directives) in the merged commit's description. 
</details>";

const UNTRACKED_OVERVIEW_TEMPLATE: &str = "
🌑 **This pull request will not trigger status changes.**

<details>
<summary>Learn more</summary>

The keyword `{{ keyword }}` was found in the PR's title, one of the [`ignoreKeywords` set in your Lunaria configuration file](https://lunaria.dev/reference/configuration/#ignorekeywords). Files changed by this PR won't trigger status changes when it is merged.

Remove the keyword from the title if the changes should be tracked.
</details>";

const IGNORED_NOTE: &str = "
> [!NOTE]  
> The notes below indicate what would happen if the pull request is merged when triggering status changes. Since a ignored keyword was found in the PR's title, the status changes indicated below won't be applied.
";

const TRACKED_FILES_TEMPLATE: &str = "### Tracked Files
{% if is_ignored %}{{ ignored_note }}{% endif %}
<details>
<summary>Files</summary>

{{ files_table }}

</details>

<details>
<summary>Warnings reference</summary>

{{ warnings_table }}

</details>";

/// Renders the full comment body.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] if a template fails to render.
pub fn render_comment(
    overview: &StatusOverview,
    files: &[ClassifiedFile],
) -> Result<String, IntakeError> {
    let env = environment()?;
    let overview_text = render_overview(&env, overview)?;
    let tracked_files = render_tracked_files(&env, files, overview.is_ignored())?;

    render(
        &env,
        "body",
        context! {
            marker => COMMENT_MARKER,
            overview => overview_text,
            tracked_files => tracked_files,
        },
    )
}

/// Files table: one `File`/`Note` row per classified file.
#[must_use]
pub fn files_table(files: &[ClassifiedFile]) -> String {
    let mut rows = vec![vec!["File".to_owned(), "Note".to_owned()]];
    rows.extend(files.iter().map(|file| vec![file.link(), file.note()]));
    markdown_table(&rows)
}

/// Reference table describing every warning icon.
#[must_use]
pub fn warnings_table() -> String {
    let mut rows = vec![vec!["Icon".to_owned(), "Description".to_owned()]];
    rows.extend(
        Warning::ALL
            .iter()
            .map(|warning| vec![warning.icon().to_owned(), warning.description().to_owned()]),
    );
    markdown_table(&rows)
}

fn environment() -> Result<Environment<'static>, IntakeError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    for (name, source) in [
        ("body", BODY_TEMPLATE),
        ("untracked_overview", UNTRACKED_OVERVIEW_TEMPLATE),
        ("tracked_files", TRACKED_FILES_TEMPLATE),
    ] {
        env.add_template(name, source)
            .map_err(|e| IntakeError::Configuration {
                message: format!("invalid comment template `{name}`: {e}"),
            })?;
    }
    Ok(env)
}

fn render_overview(env: &Environment<'_>, overview: &StatusOverview) -> Result<String, IntakeError> {
    match overview.keyword() {
        None => Ok(TRACKED_OVERVIEW.to_owned()),
        Some(keyword) => render(env, "untracked_overview", context! { keyword => keyword }),
    }
}

fn render_tracked_files(
    env: &Environment<'_>,
    files: &[ClassifiedFile],
    is_ignored: bool,
) -> Result<String, IntakeError> {
    render(
        env,
        "tracked_files",
        context! {
            is_ignored => is_ignored,
            ignored_note => IGNORED_NOTE,
            files_table => files_table(files),
            warnings_table => warnings_table(),
        },
    )
}

fn render(
    env: &Environment<'_>,
    name: &str,
    ctx: minijinja::Value,
) -> Result<String, IntakeError> {
    let template = env.get_template(name).map_err(|e| IntakeError::Configuration {
        message: format!("missing comment template `{name}`: {e}"),
    })?;
    template.render(ctx).map_err(|e| IntakeError::Configuration {
        message: format!("comment rendering failed: {e}"),
    })
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
