//! Bash completion function body

/// Lines of the body of a bash completion function
///
/// `static_options` replaces the `--commands` query for command names and
/// `static_flags` replaces the `--flag-completion` query. With static
/// options but no static flags, no flags are offered. The function is
/// expected to be registered with `complete -F` so `$1` is the program.
pub fn completion_script_lines(static_options: Option<&str>, static_flags: Option<&str>) -> Vec<String> {
    let options = match static_options {
        Some(options) => options.to_string(),
        None => r#"$("$1" --commands)"#.to_string(),
    };
    let flags = match (static_flags, static_options) {
        (Some(flags), _) => shell_quote(flags),
        (None, Some(_)) => "''".to_string(),
        (None, None) => r#"$("$1" --flag-completion "${COMP_WORDS[@]}")"#.to_string(),
    };

    let body = format!(
        r#"COMPREPLY=()
MY_WORDNUM=1
if [ "${{COMP_CWORD}}" = 2 ] && [ "${{COMP_WORDS[1]}}" = help ]; then
  MY_WORDNUM=2
elif [ "${{COMP_CWORD}}" != "1" ]; then
  HELP_FLAG="--help"
  if [ -n "${{COMP_WORDS[$COMP_CWORD]}}" ] && [ "${{HELP_FLAG#${{COMP_WORDS[$COMP_CWORD]}}}}" = "$HELP_FLAG" ]; then
    # Word being completed is not a prefix of --help
    :
  elif ! {{ echo " ${{COMP_WORDS[*]}}" | grep -Eq '\s(--help|-h|--\s)'; }}; then
    COMPREPLY=("--help")
  fi
  DO_COMPGEN=true
  if ! {{ echo " ${{COMP_WORDS[*]}}" | grep -Eq '\s(--help|-h|--\s)'; }}; then
    FLAGS_CANDIDATE={flags}
    if [ "$(echo "$FLAGS_CANDIDATE" | head -n1)" == '{sentinel}' ]; then
      DO_COMPGEN=false
      COMPREPLY+=($(echo "$FLAGS_CANDIDATE" | tail -n+2))
    else
      COMPREPLY+=($FLAGS_CANDIDATE)
    fi
  fi
  if $DO_COMPGEN && [ "${{COMP_WORDS[$COMP_CWORD]}}" != "--" ] && ! {{ echo " ${{COMP_WORDS[*]}}" | grep -Eq '\s(--help|-h)'; }}; then
    COMPREPLY+=($(compgen -f -d -- "${{COMP_WORDS[$COMP_CWORD]}}"))
  fi
  return
fi
COMPREPLY=($(compgen -W "{options}" -- "${{COMP_WORDS[$MY_WORDNUM]}}"))"#,
        flags = flags,
        options = options,
        sentinel = super::NO_FS_COMPLETION,
    );

    body.lines().map(|line| format!("  {}", line)).collect()
}

/// A complete completion file: the function and its registration
pub fn completion_script(function_name: &str, program: &str) -> String {
    let mut script = format!("{}() {{\n", function_name);
    for line in completion_script_lines(None, None) {
        script.push_str(&line);
        script.push('\n');
    }
    script.push_str("}\n");
    script.push_str(&format!(
        "complete -F {} -o bashdefault {}\n",
        function_name, program
    ));
    script
}

/// Quote `text` as a single shell word
pub fn shell_quote(text: &str) -> String {
    if !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c))
    {
        return text.to_string();
    }
    format!("'{}'", text.replace('\'', r"'\''"))
}
