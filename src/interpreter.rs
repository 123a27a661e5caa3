//! The command engine: consumes a token sequence positionally, dispatches on
//! the leading command word, and reports every outcome as a line of text on a
//! caller-supplied output sink.
//!
//! Every error in the taxonomy (see [`Diagnostic`]) is caught where it is
//! detected and rendered as exactly one output line; nothing short of an I/O
//! fault on the sink escapes to the caller, so the engine stays usable for
//! the next input line.

use crate::env::Environment;
use crate::lexer::{self, CmpOp, Keyword, Token};
use crate::value::Value;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use thiserror::Error;

/// Command words the engine dispatches on. `set` through `help` arrive as
/// keyword tokens; `clear` and `exit` arrive as identifiers.
const COMMANDS: &[&str] = &[
    "set", "print", "add", "sub", "mult", "div", "if", "help", "clear", "exit",
];

/// A non-fatal, user-facing error message emitted in place of a failed
/// operation's normal output. One variant per taxonomy entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    /// The leading token is not a known command word.
    #[error("Unrecognized command '{0}'.")]
    UnrecognizedCommand(String),
    /// A required token position held the wrong kind of token.
    #[error("Syntax error in {command} command. Expected format: {expected}")]
    Syntax {
        command: &'static str,
        expected: &'static str,
    },
    /// The token sequence ran out before a handler finished consuming.
    #[error("Incomplete command. Check your syntax.")]
    IncompleteCommand,
    /// `print` referenced a name with no binding.
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),
    /// The second operand of `div` was numeric zero.
    #[error("Error: Division by zero")]
    DivisionByZero,
    /// An operation cannot combine the resolved operand types.
    #[error("Error: cannot apply '{op}' to {} '{lhs}' and {} '{rhs}' - check that both operands are numbers or properly defined variables.", .lhs.type_name(), .rhs.type_name())]
    TypeMismatch {
        op: &'static str,
        lhs: Value,
        rhs: Value,
    },
    /// A token outside the comparison-operator set reached the condition
    /// evaluator.
    #[error("Unsupported operator '{0}'.")]
    UnsupportedOperator(String),
    /// An operation's result would exceed the engine's size cap.
    #[error("Error: the result of {op} is too large.")]
    OversizedResult { op: &'static str },
}

/// Internal handler error: either a diagnostic to print, or a real I/O fault
/// on the output sink. Lets handlers use `?` on both.
#[derive(Debug, Error)]
enum ExecError {
    #[error(transparent)]
    Diagnostic(#[from] Diagnostic),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Explicit cursor over one line's token sequence.
///
/// Exhaustion is an ordinary value: [`Cursor::demand`] maps an empty cursor
/// to [`Diagnostic::IncompleteCommand`] instead of unwinding.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn demand(&mut self) -> Result<&'a Token, Diagnostic> {
        self.next().ok_or(Diagnostic::IncompleteCommand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MathOp {
    Add,
    Sub,
    Mult,
    Div,
}

impl MathOp {
    fn as_str(self) -> &'static str {
        match self {
            MathOp::Add => "add",
            MathOp::Sub => "sub",
            MathOp::Mult => "mult",
            MathOp::Div => "div",
        }
    }

    /// Applies the operator to two resolved operands and renders the result.
    ///
    /// Integer arithmetic saturates at the i64 range. `add` concatenates two
    /// text values and `mult` repeats a text by an integer count, capped at
    /// [`MAX_REPEAT_LEN`]; every other mixed-type combination is a type
    /// mismatch. Division is real-valued and its zero check on the right
    /// operand comes before any type check.
    fn apply(self, lhs: Value, rhs: Value) -> Result<String, Diagnostic> {
        use Value::{Int, Text};
        let result = match (self, &lhs, &rhs) {
            (MathOp::Add, Int(a), Int(b)) => a.saturating_add(*b).to_string(),
            (MathOp::Add, Text(a), Text(b)) => format!("{a}{b}"),
            (MathOp::Sub, Int(a), Int(b)) => a.saturating_sub(*b).to_string(),
            (MathOp::Mult, Int(a), Int(b)) => a.saturating_mul(*b).to_string(),
            (MathOp::Mult, Text(s), Int(n)) | (MathOp::Mult, Int(n), Text(s)) => {
                repeat_text(s, *n)?
            }
            (MathOp::Div, _, Int(0)) => return Err(Diagnostic::DivisionByZero),
            // Debug formatting keeps the `.0` on whole-valued quotients.
            (MathOp::Div, Int(a), Int(b)) => format!("{:?}", *a as f64 / *b as f64),
            _ => {
                return Err(Diagnostic::TypeMismatch {
                    op: self.as_str(),
                    lhs,
                    rhs,
                });
            }
        };
        Ok(result)
    }
}

/// Longest text a repetition may produce. Anything bigger is rejected with a
/// diagnostic before allocation.
const MAX_REPEAT_LEN: usize = 1 << 20;

fn repeat_text(s: &str, count: i64) -> Result<String, Diagnostic> {
    if count <= 0 || s.is_empty() {
        return Ok(String::new());
    }
    let total = s.len() as u128 * count as u128;
    if total > MAX_REPEAT_LEN as u128 {
        return Err(Diagnostic::OversizedResult { op: "mult" });
    }
    Ok(s.repeat(count as usize))
}

/// Evaluates a comparison between two resolved operands.
///
/// Equality works across types (an Int never equals a Text); the ordering
/// operators are defined only between values of the same type.
fn compare(op: CmpOp, lhs: Value, rhs: Value) -> Result<bool, Diagnostic> {
    let verdict = match op {
        CmpOp::Eq => lhs == rhs,
        CmpOp::Ne => lhs != rhs,
        _ => {
            let Some(ord) = lhs.partial_cmp(&rhs) else {
                return Err(Diagnostic::TypeMismatch {
                    op: op.as_str(),
                    lhs,
                    rhs,
                });
            };
            match op {
                CmpOp::Gt => ord.is_gt(),
                CmpOp::Lt => ord.is_lt(),
                CmpOp::Ge => ord.is_ge(),
                CmpOp::Le => ord.is_le(),
                CmpOp::Eq | CmpOp::Ne => unreachable!(),
            }
        }
    };
    Ok(verdict)
}

/// The value a token denotes when taken literally, with no store lookup.
fn literal_value(token: &Token) -> Value {
    match token {
        Token::Number(n) => Value::Int(*n),
        Token::Str(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

/// The Compass command interpreter.
///
/// Owns the variable store for its whole lifetime and executes one line's
/// worth of tokens at a time. All observable results are written to the
/// output sink passed to [`Interpreter::execute`]; variable mutations are
/// visible to subsequent calls on the same instance.
///
/// Example
/// ```
/// use compass::{Interpreter, tokenize};
/// let mut interp = Interpreter::new();
/// let mut out = Vec::new();
/// interp.execute(&tokenize("set x to 10"), &mut out).unwrap();
/// interp.execute(&tokenize("print x"), &mut out).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.ends_with("10\n"));
/// ```
pub struct Interpreter {
    env: Environment,
    commands: &'static [&'static str],
}

impl Interpreter {
    /// Creates an interpreter with an empty variable store.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            commands: COMMANDS,
        }
    }

    /// Read-only view of the variable store and the exit flag.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Executes one line's token sequence.
    ///
    /// At most one top-level command runs per call (plus one inline command
    /// for a true `if`); trailing tokens after a satisfied command are
    /// ignored. An empty sequence does nothing. Diagnostics become output
    /// lines; only sink I/O faults are returned as errors.
    pub fn execute(&mut self, tokens: &[Token], out: &mut dyn Write) -> anyhow::Result<()> {
        let mut cursor = Cursor::new(tokens);
        let Some(first) = cursor.next() else {
            return Ok(());
        };
        match self.dispatch(first, &mut cursor, out) {
            Ok(()) => Ok(()),
            Err(ExecError::Diagnostic(diag)) => {
                writeln!(out, "{diag}")?;
                Ok(())
            }
            Err(ExecError::Io(err)) => Err(err.into()),
        }
    }

    fn dispatch(
        &mut self,
        first: &Token,
        cursor: &mut Cursor,
        out: &mut dyn Write,
    ) -> Result<(), ExecError> {
        let word = match first {
            Token::Keyword(kw) => kw.as_str(),
            Token::Ident(name) => name.as_str(),
            other => return Err(Diagnostic::UnrecognizedCommand(other.to_string()).into()),
        };
        // Membership pre-check before any handler touches the cursor.
        if !self.commands.contains(&word) {
            return Err(Diagnostic::UnrecognizedCommand(word.to_string()).into());
        }
        match word {
            "set" => self.handle_set(cursor, out),
            "print" => self.handle_print(cursor, out),
            "add" => self.handle_math(MathOp::Add, cursor, out),
            "sub" => self.handle_math(MathOp::Sub, cursor, out),
            "mult" => self.handle_math(MathOp::Mult, cursor, out),
            "div" => self.handle_math(MathOp::Div, cursor, out),
            "if" => self.handle_if(cursor, out),
            "help" => self.print_help(out),
            "clear" => self.handle_clear(out),
            "exit" => {
                self.env.should_exit = true;
                Ok(())
            }
            other => Err(Diagnostic::UnrecognizedCommand(other.to_string()).into()),
        }
    }

    /// `set <var> to <value>` — stores the value token literally: numbers
    /// stay numbers, strings stay their dequoted text.
    fn handle_set(&mut self, cursor: &mut Cursor, out: &mut dyn Write) -> Result<(), ExecError> {
        let ident = cursor.demand()?;
        let to = cursor.demand()?;
        let value_token = cursor.demand()?;
        let (Token::Ident(name), Token::Keyword(Keyword::To)) = (ident, to) else {
            return Err(Diagnostic::Syntax {
                command: "set",
                expected: "set <var> to <value>",
            }
            .into());
        };
        let value = literal_value(value_token);
        writeln!(out, "Variable '{name}' set to {value}.")?;
        self.env.set_var(name.clone(), value);
        Ok(())
    }

    /// `print <var>` — renders the bound value, mutating nothing.
    fn handle_print(&mut self, cursor: &mut Cursor, out: &mut dyn Write) -> Result<(), ExecError> {
        let token = cursor.demand()?;
        let Token::Ident(name) = token else {
            return Err(Diagnostic::Syntax {
                command: "print",
                expected: "print <var>",
            }
            .into());
        };
        match self.env.get_var(name) {
            Some(value) => writeln!(out, "{value}")?,
            None => return Err(Diagnostic::UndefinedVariable(name.clone()).into()),
        }
        Ok(())
    }

    /// `(add|sub|mult|div) <operand> to <operand>`.
    fn handle_math(
        &mut self,
        op: MathOp,
        cursor: &mut Cursor,
        out: &mut dyn Write,
    ) -> Result<(), ExecError> {
        let lhs_token = cursor.demand()?;
        // The middle `to` is consumed but, as in the original grammar, not
        // validated.
        cursor.demand()?;
        let rhs_token = cursor.demand()?;
        let lhs = self.resolve(lhs_token);
        let rhs = self.resolve(rhs_token);
        let result = op.apply(lhs, rhs)?;
        writeln!(out, "The result of {} is {}", op.as_str(), result)?;
        Ok(())
    }

    /// `if <operand> <op> <operand> : <command>` — on a true condition the
    /// inline command goes through the same dispatch table as a top-level
    /// command; on a false one nothing further is consumed.
    fn handle_if(&mut self, cursor: &mut Cursor, out: &mut dyn Write) -> Result<(), ExecError> {
        let lhs_token = cursor.demand()?;
        let op_token = cursor.demand()?;
        let rhs_token = cursor.demand()?;
        let colon = cursor.demand()?;
        let Token::Op(op) = op_token else {
            return Err(Diagnostic::UnsupportedOperator(op_token.to_string()).into());
        };
        if !matches!(colon, Token::Colon) {
            return Err(Diagnostic::Syntax {
                command: "if",
                expected: "if <condition>: <command>",
            }
            .into());
        }
        let lhs = self.resolve(lhs_token);
        let rhs = self.resolve(rhs_token);
        if compare(*op, lhs, rhs)? {
            let inline = cursor.demand()?;
            self.dispatch(inline, cursor, out)?;
        }
        Ok(())
    }

    fn handle_clear(&mut self, out: &mut dyn Write) -> Result<(), ExecError> {
        self.env.clear();
        writeln!(out, "Environment cleared.")?;
        Ok(())
    }

    fn print_help(&self, out: &mut dyn Write) -> Result<(), ExecError> {
        writeln!(out, "Available commands:")?;
        writeln!(out, "  set <var> to <value> - Assigns a value to a variable")?;
        writeln!(out, "  print <var> - Prints the value of a variable")?;
        writeln!(out, "  add <arg1> to <arg2> - Adds two values")?;
        writeln!(out, "  sub <arg1> to <arg2> - Subtracts second from the first")?;
        writeln!(out, "  mult <arg1> to <arg2> - Multiplies two values")?;
        writeln!(out, "  div <arg1> to <arg2> - Divides the first by the second")?;
        writeln!(
            out,
            "  if <condition>: <command> - Executes a command if the condition is true"
        )?;
        writeln!(out, "  clear - Clears all variables")?;
        writeln!(out, "  help - Displays this help message")?;
        writeln!(out, "  exit - Exits the program")?;
        Ok(())
    }

    /// Resolves an operand token: variable lookup by the token's textual form
    /// with literal fallback, then the digit-string coercion. Number and
    /// string literals skip the lookup.
    fn resolve(&self, token: &Token) -> Value {
        let value = match token {
            Token::Number(n) => Value::Int(*n),
            Token::Str(s) => Value::Text(s.clone()),
            other => {
                let word = other.to_string();
                match self.env.get_var(&word) {
                    Some(bound) => bound.clone(),
                    None => Value::Text(word),
                }
            }
        };
        value.coerced()
    }

    /// Interactive session: reads lines, tokenizes, executes, and stops on
    /// `exit`, Ctrl-C or Ctrl-D.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        println!("Welcome to the world of programming! Get started with Compass.");
        println!("With the help of Compass, you will master the art of coding! Type 'exit' to exit.");

        loop {
            match rl.readline(">> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    let tokens = lexer::tokenize(&line);
                    self.execute(&tokens, &mut std::io::stdout())?;
                    if self.env.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
