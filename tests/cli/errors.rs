use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_no_arguments_prints_usage() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.extract(&[])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("Usage: xgettext-soy"));

    Ok(())
}

#[test]
fn test_help_argument_prints_usage() -> Result<()> {
    let test = CliTest::new()?;

    for args in [
        &["--help"][..],
        &["help"],
        &["-h"],
        &["templates", "--help"],
        &["-v", "templates", "-h"],
    ] {
        let output = test.extract(args)?;
        assert_eq!(output.status.code(), Some(1), "{args:?}");
        assert_eq!(stdout(&output), "", "{args:?}");
        assert!(stderr(&output).contains("<INPUTPATH>..."), "{args:?}");
    }

    Ok(())
}

#[test]
fn test_unknown_option_fails() -> Result<()> {
    let test = CliTest::with_file("app.soy", "{namespace app}\n")?;

    let output = test.extract(&["app.soy", "--no-such-option"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");

    Ok(())
}

#[test]
fn test_parse_error() -> Result<()> {
    let test = CliTest::with_file(
        "templates/app.soy",
        r#"{namespace app}
{template .greet}
  {call .other /}
{/template}
"#,
    )?;

    let output = test.extract(&["templates"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_snapshot!(stderr(&output), @r"
    error[parse-failure]: unknown command 'call'
      --> templates/app.soy:3:3
       |
     3 |   {call .other /}
       |   ^
    ");

    Ok(())
}

#[test]
fn test_missing_namespace() -> Result<()> {
    let test = CliTest::with_file(
        "templates/app.soy",
        "{template .greet}{msg desc=\"x\"}Hi{/msg}{/template}\n",
    )?;

    let output = test.extract(&["templates"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).starts_with("error[malformed-input]: "));
    assert!(stderr(&output).contains("--> templates/app.soy"));

    Ok(())
}

#[test]
fn test_duplicate_template() -> Result<()> {
    let test = CliTest::new()?;
    let source = "{namespace app}\n{template .greet}{msg desc=\"x\"}Hi{/msg}{/template}\n";
    test.write_file("templates/a.soy", source)?;
    test.write_file("templates/b.soy", source)?;

    let output = test.extract(&["templates"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_snapshot!(stderr(&output), @r"
    error[duplicate-template]: template 'app.greet' is defined more than once
     --> templates/b.soy
      = note: first defined in templates/a.soy
    ");

    Ok(())
}

#[test]
fn test_select_is_rejected() -> Result<()> {
    let test = CliTest::with_file(
        "app.soy",
        r#"{namespace app}
{template .invite}
  {msg desc="invite"}{select $gender}{case 'female'}She{default}They{/select} invited you{/msg}
{/template}
"#,
    )?;

    let output = test.extract(&["app.soy"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_snapshot!(stderr(&output), @r"
    error[invalid-message]: {select} is not supported in PO catalogs
     --> app.soy:3
      = note: in template 'app.invite'
    ");

    Ok(())
}

#[test]
fn test_empty_message_is_rejected() -> Result<()> {
    let test = CliTest::with_file(
        "app.soy",
        r#"{namespace app}
{template .blank}
  {msg desc="nothing"}{nil}{/msg}
{/template}
"#,
    )?;

    let output = test.extract(&["app.soy"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_snapshot!(stderr(&output), @r"
    error[invalid-message]: {msg} has no translatable text
     --> app.soy:3
      = note: in template 'app.blank'
    ");

    Ok(())
}

#[test]
fn test_missing_input_path() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.extract(&["nope"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).starts_with("error[io-failure]: "));
    assert!(stderr(&output).contains("--> nope"));

    Ok(())
}

#[test]
fn test_failed_run_does_not_write_output_file() -> Result<()> {
    let test = CliTest::with_file("app.soy", "{namespace app}\n{template .t}\n")?;

    let output = test.extract(&["app.soy", "-o", "messages.pot"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(!test.root().join("messages.pot").exists());

    Ok(())
}
