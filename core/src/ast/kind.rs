//! file: core/src/ast/kind.rs
//! description: typed command and expression trees.
//!
//! The exporter writes commands and expressions as tagged JSON arrays
//! (`["set", "score", ["get", "score"]]`). These enums are the typed
//! form the lowering passes match on; unknown tags survive decoding as
//! the `Unknown` arms so they can be reported softly.

/// Comparison operators accepted in `if`/`while` conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,  // lt
    Lte, // lte
    Gt,  // gt
    Gte, // gte
    Eq,  // eq
    Neq, // neq
}

impl CompareOp {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "lt" => Some(CompareOp::Lt),
            "lte" => Some(CompareOp::Lte),
            "gt" => Some(CompareOp::Gt),
            "gte" => Some(CompareOp::Gte),
            "eq" => Some(CompareOp::Eq),
            "neq" => Some(CompareOp::Neq),
            _ => None,
        }
    }

    /// Lua spelling of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Eq => "==",
            CompareOp::Neq => "~=",
        }
    }
}

/// Assignment family. All of them lower to `lvalue OP= rvalue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Div,
    Mul,
}

impl AssignOp {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "set" => Some(AssignOp::Set),
            "add" => Some(AssignOp::Add),
            "sub" => Some(AssignOp::Sub),
            "div" => Some(AssignOp::Div),
            "mul" => Some(AssignOp::Mul),
            _ => None,
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            AssignOp::Set => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Div => "/=",
            AssignOp::Mul => "*=",
        }
    }
}

/// Built-in statement verbs routed through the call resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StmtFunc {
    Goto,
    Shake,
    Fin,
    Hide,
    Draw,
    Bpm,
    Sound,
    Invert,
    Frame,
    Fill,
    Swap,
    Label,
    Restore,
    Store,
    Toss,
    Wait,
    Say,
    Ask,
    Menu,
    Option,
    Act,
    Loop,
    Once,
    Stop,
    Ignore,
    Listen,
    Log,
    Dump,
    Window,
    Crop,
    Play,
}

impl StmtFunc {
    pub const ALL: [StmtFunc; 31] = [
        StmtFunc::Goto,
        StmtFunc::Shake,
        StmtFunc::Fin,
        StmtFunc::Hide,
        StmtFunc::Draw,
        StmtFunc::Bpm,
        StmtFunc::Sound,
        StmtFunc::Invert,
        StmtFunc::Frame,
        StmtFunc::Fill,
        StmtFunc::Swap,
        StmtFunc::Label,
        StmtFunc::Restore,
        StmtFunc::Store,
        StmtFunc::Toss,
        StmtFunc::Wait,
        StmtFunc::Say,
        StmtFunc::Ask,
        StmtFunc::Menu,
        StmtFunc::Option,
        StmtFunc::Act,
        StmtFunc::Loop,
        StmtFunc::Once,
        StmtFunc::Stop,
        StmtFunc::Ignore,
        StmtFunc::Listen,
        StmtFunc::Log,
        StmtFunc::Dump,
        StmtFunc::Window,
        StmtFunc::Crop,
        StmtFunc::Play,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StmtFunc::Goto => "goto",
            StmtFunc::Shake => "shake",
            StmtFunc::Fin => "fin",
            StmtFunc::Hide => "hide",
            StmtFunc::Draw => "draw",
            StmtFunc::Bpm => "bpm",
            StmtFunc::Sound => "sound",
            StmtFunc::Invert => "invert",
            StmtFunc::Frame => "frame",
            StmtFunc::Fill => "fill",
            StmtFunc::Swap => "swap",
            StmtFunc::Label => "label",
            StmtFunc::Restore => "restore",
            StmtFunc::Store => "store",
            StmtFunc::Toss => "toss",
            StmtFunc::Wait => "wait",
            StmtFunc::Say => "say",
            StmtFunc::Ask => "ask",
            StmtFunc::Menu => "menu",
            StmtFunc::Option => "option",
            StmtFunc::Act => "act",
            StmtFunc::Loop => "loop",
            StmtFunc::Once => "once",
            StmtFunc::Stop => "stop",
            StmtFunc::Ignore => "ignore",
            StmtFunc::Listen => "listen",
            StmtFunc::Log => "log",
            StmtFunc::Dump => "dump",
            StmtFunc::Window => "window",
            StmtFunc::Crop => "crop",
            StmtFunc::Play => "play",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        StmtFunc::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Built-in functions usable inside expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprFunc {
    Type,
    Id,
    Solid,
    Frame,
    Floor,
    Round,
    Ceil,
    Invert,
    Name,
    Random,
    Sine,
    Cosine,
    Tangent,
    Degrees,
    Radians,
    Lpad,
    Rpad,
}

impl ExprFunc {
    pub const ALL: [ExprFunc; 17] = [
        ExprFunc::Type,
        ExprFunc::Id,
        ExprFunc::Solid,
        ExprFunc::Frame,
        ExprFunc::Floor,
        ExprFunc::Round,
        ExprFunc::Ceil,
        ExprFunc::Invert,
        ExprFunc::Name,
        ExprFunc::Random,
        ExprFunc::Sine,
        ExprFunc::Cosine,
        ExprFunc::Tangent,
        ExprFunc::Degrees,
        ExprFunc::Radians,
        ExprFunc::Lpad,
        ExprFunc::Rpad,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExprFunc::Type => "type",
            ExprFunc::Id => "id",
            ExprFunc::Solid => "solid",
            ExprFunc::Frame => "frame",
            ExprFunc::Floor => "floor",
            ExprFunc::Round => "round",
            ExprFunc::Ceil => "ceil",
            ExprFunc::Invert => "invert",
            ExprFunc::Name => "name",
            ExprFunc::Random => "random",
            ExprFunc::Sine => "sine",
            ExprFunc::Cosine => "cosine",
            ExprFunc::Tangent => "tangent",
            ExprFunc::Degrees => "degrees",
            ExprFunc::Radians => "radians",
            ExprFunc::Lpad => "lpad",
            ExprFunc::Rpad => "rpad",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ExprFunc::ALL.iter().copied().find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Float(f64),
    Nil,
    /// Variable read.
    Get(String),
    /// Tile reference folded to its numeric id at compile time.
    ResolvedId { id: i64, name: String },
    /// String interpolation: literal fragments and sub-expressions.
    Format(Vec<Expr>),
    Embed(Box<Expr>),
    Func { func: ExprFunc, args: Vec<Arg> },
    /// Inline subroutine; the payload is a block index.
    Block(usize),
    Unknown(String),
}

/// Operand of a call. Structured shapes fill named argument slots.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Xy(Expr, Expr),
    Rect { x: Expr, y: Expr, w: Expr, h: Option<Expr> },
    Value(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub op: CompareOp,
    pub left: Expr,
    pub right: Expr,
}

/// Continuation of an `if` chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    ElseIf { cond: Condition, body: usize, branches: Vec<Branch> },
    Else { body: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    /// A bare token: `call "hit"`.
    Name(String),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `_`: an empty source line.
    Blank,
    /// `done`: early return from the handler.
    Done,
    Assign { op: AssignOp, target: String, value: Expr },
    Inc(String),
    Dec(String),
    Random { low: Expr, high: Option<Expr> },
    If { cond: Condition, body: usize, branches: Vec<Branch> },
    While { cond: Condition, body: usize },
    Call(CallTarget),
    Emit(Expr),
    Mimic(Expr),
    Tell { target: Arg, rest: Vec<Arg> },
    Builtin { func: StmtFunc, args: Vec<Arg> },
    Comment { index: usize, inline: bool },
    Unknown(String),
}

impl Command {
    /// Blank lines and comments carry no behaviour.
    pub fn is_decoration(&self) -> bool {
        matches!(self, Command::Comment { .. } | Command::Blank)
    }
}
