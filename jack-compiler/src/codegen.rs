//! VM code generator for the Jack compiler.
//!
//! Walks the AST built by `jack_analyzer` and emits VM code directly via
//! the `VMWriter`. No constant folding, peephole rewriting, or strength
//! reduction is applied anywhere in this module: every arithmetic operator
//! and every term lowers to exactly the instruction sequence the language
//! defines, with no dependence on operand values known at compile time.

use crate::error::CompileError;
use crate::symbol_table::{SymbolKind, SymbolTable};
use crate::vm_writer::VMWriter;
use jack_analyzer::ast::*;

/// Write a u32 value to a string buffer without allocation.
#[inline]
fn write_u32(n: u32, buf: &mut String) {
    if n == 0 {
        buf.push('0');
        return;
    }
    let mut digits = [0u8; 10]; // Max 10 digits for u32
    let mut i = 0;
    let mut num = n;
    while num > 0 {
        digits[i] = (num % 10) as u8;
        num /= 10;
        i += 1;
    }
    while i > 0 {
        i -= 1;
        buf.push((b'0' + digits[i]) as char);
    }
}

/// Write a u16 value to a string buffer without allocation.
#[inline]
fn write_u16(n: u16, buf: &mut String) {
    if n == 0 {
        buf.push('0');
        return;
    }
    let mut digits = [0u8; 5]; // Max 5 digits for u16
    let mut i = 0;
    let mut num = n;
    while num > 0 {
        digits[i] = (num % 10) as u8;
        num /= 10;
        i += 1;
    }
    while i > 0 {
        i -= 1;
        buf.push((b'0' + digits[i]) as char);
    }
}

/// Code generator that compiles Jack AST to VM code.
pub struct CodeGenerator {
    /// Symbol table for variable lookup.
    symbols: SymbolTable,
    /// VM code emitter.
    vm: VMWriter,
    /// Per-class counter for `if` statement labels (IF_TRUE/IF_FALSE/IF_END).
    /// Shared across all subroutines of a class, never reset per-subroutine.
    if_counter: u32,
    /// Per-class counter for `while` statement labels (WHILE_EXP/WHILE_END).
    while_counter: u32,
    /// Current class name.
    class_name: String,
    /// Current subroutine kind (for `this` handling).
    current_subroutine_kind: Option<SubroutineKind>,
    /// Collected compilation errors.
    errors: Vec<CompileError>,
}

impl CodeGenerator {
    /// Create a new code generator.
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            vm: VMWriter::new(),
            if_counter: 0,
            while_counter: 0,
            class_name: String::new(),
            current_subroutine_kind: None,
            errors: Vec::new(),
        }
    }

    /// Compile a class to VM code.
    ///
    /// Returns the generated VM code or a list of errors.
    pub fn compile(class: &Class) -> Result<String, Vec<CompileError>> {
        let mut compiler = CodeGenerator::new();
        compiler.compile_class(class);

        if compiler.errors.is_empty() {
            Ok(compiler.vm.into_output())
        } else {
            Err(compiler.errors)
        }
    }

    /// Generate the next `if` label with the given suffix ("TRUE"/"FALSE"/"END"),
    /// all three drawn from the same counter value for one `if` statement.
    #[inline]
    fn if_label(&self, suffix: &str, k: u32) -> String {
        let mut label = String::with_capacity(8 + suffix.len() + 10);
        label.push_str("IF_");
        label.push_str(suffix);
        write_u32(k, &mut label);
        label
    }

    /// Generate the next `while` label with the given suffix ("EXP"/"END").
    #[inline]
    fn while_label(&self, suffix: &str, k: u32) -> String {
        let mut label = String::with_capacity(6 + suffix.len() + 10);
        label.push_str("WHILE_");
        label.push_str(suffix);
        write_u32(k, &mut label);
        label
    }

    /// Record a compilation error.
    fn error(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    // ========================================================================
    // Class Compilation
    // ========================================================================

    fn compile_class(&mut self, class: &Class) {
        self.class_name = class.name.clone();
        self.symbols.start_class(&class.name);

        // Define class-level variables
        for var_dec in &class.class_var_decs {
            self.compile_class_var_dec(var_dec);
        }

        // Compile subroutines
        for sub in &class.subroutine_decs {
            self.compile_subroutine(sub);
        }
    }

    fn compile_class_var_dec(&mut self, dec: &ClassVarDec) {
        let kind = match dec.kind {
            ClassVarKind::Static => SymbolKind::Static,
            ClassVarKind::Field => SymbolKind::Field,
        };

        for name in &dec.names {
            if let Err(e) = self
                .symbols
                .define(name, dec.var_type.clone(), kind, dec.span.clone())
            {
                self.error(e);
            }
        }
    }

    // ========================================================================
    // Subroutine Compilation
    // ========================================================================

    fn compile_subroutine(&mut self, sub: &SubroutineDec) {
        self.symbols.start_subroutine();
        self.current_subroutine_kind = Some(sub.kind);

        // For methods, `this` is argument 0
        if sub.kind == SubroutineKind::Method
            && let Err(e) = self.symbols.define(
                "this",
                Type::ClassName(self.class_name.clone()),
                SymbolKind::Argument,
                sub.span.clone(),
            )
        {
            self.error(e);
        }

        // Define parameters
        for param in &sub.parameters {
            if let Err(e) = self.symbols.define(
                &param.name,
                param.var_type.clone(),
                SymbolKind::Argument,
                sub.span.clone(),
            ) {
                self.error(e);
            }
        }

        // Define local variables
        for var_dec in &sub.body.var_decs {
            for name in &var_dec.names {
                if let Err(e) = self.symbols.define(
                    name,
                    var_dec.var_type.clone(),
                    SymbolKind::Local,
                    var_dec.span.clone(),
                ) {
                    self.error(e);
                }
            }
        }

        // Emit function declaration (zero-allocation)
        let num_locals = self.symbols.var_count(SymbolKind::Local);
        {
            let buf = self.vm.output_mut();
            buf.push_str("function ");
            buf.push_str(&self.class_name);
            buf.push('.');
            buf.push_str(&sub.name);
            buf.push(' ');
            write_u16(num_locals, buf);
            buf.push('\n');
        }

        // Handle constructor/method preamble
        match sub.kind {
            SubroutineKind::Constructor => {
                // Allocate memory for object fields
                let field_count = self.symbols.field_count();
                self.vm.write_push("constant", field_count);
                self.vm.write_call("Memory.alloc", 1);
                self.vm.write_pop("pointer", 0);
            }
            SubroutineKind::Method => {
                // Set `this` to argument 0
                self.vm.write_push("argument", 0);
                self.vm.write_pop("pointer", 0);
            }
            SubroutineKind::Function => {
                // No special setup needed
            }
        }

        // Compile statements
        self.compile_statements(&sub.body.statements);
    }

    // ========================================================================
    // Statement Compilation
    // ========================================================================

    #[inline]
    fn compile_statements(&mut self, statements: &[Statement]) {
        for stmt in statements {
            self.compile_statement(stmt);
        }
    }

    #[inline]
    fn compile_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Let(s) => self.compile_let(s),
            Statement::If(s) => self.compile_if(s),
            Statement::While(s) => self.compile_while(s),
            Statement::Do(s) => self.compile_do(s),
            Statement::Return(s) => self.compile_return(s),
        }
    }

    fn compile_let(&mut self, stmt: &LetStatement) {
        let symbol = match self.symbols.lookup(&stmt.var_name) {
            Some(s) => s.clone(),
            None => {
                self.error(CompileError::undefined_variable(
                    &stmt.var_name,
                    stmt.span.clone(),
                ));
                return;
            }
        };

        if let Some(index_expr) = &stmt.index {
            // Array assignment: let arr[i] = expr
            // Push base address
            self.vm.write_push(symbol.segment(), symbol.index);
            // Compile and add index
            self.compile_expression(index_expr);
            self.vm.write_arithmetic("add");
            // Compile value
            self.compile_expression(&stmt.value);
            // Store via THAT
            self.vm.write_pop("temp", 0);
            self.vm.write_pop("pointer", 1);
            self.vm.write_push("temp", 0);
            self.vm.write_pop("that", 0);
        } else {
            // Simple assignment
            self.compile_expression(&stmt.value);
            self.vm.write_pop(symbol.segment(), symbol.index);
        }
    }

    fn compile_if(&mut self, stmt: &IfStatement) {
        let k = self.if_counter;
        self.if_counter += 1;
        let true_label = self.if_label("TRUE", k);
        let false_label = self.if_label("FALSE", k);

        self.compile_expression(&stmt.condition);
        self.vm.write_if_goto(&true_label);
        self.vm.write_goto(&false_label);
        self.vm.write_label(&true_label);
        self.compile_statements(&stmt.then_statements);

        // IF_END is only emitted when an else branch exists; otherwise
        // IF_FALSE is the fallthrough merge point.
        if let Some(else_stmts) = &stmt.else_statements {
            let end_label = self.if_label("END", k);
            self.vm.write_goto(&end_label);
            self.vm.write_label(&false_label);
            self.compile_statements(else_stmts);
            self.vm.write_label(&end_label);
        } else {
            self.vm.write_label(&false_label);
        }
    }

    fn compile_while(&mut self, stmt: &WhileStatement) {
        let k = self.while_counter;
        self.while_counter += 1;
        let exp_label = self.while_label("EXP", k);
        let end_label = self.while_label("END", k);

        self.vm.write_label(&exp_label);

        // Compile condition
        self.compile_expression(&stmt.condition);
        self.vm.write_arithmetic("not");
        self.vm.write_if_goto(&end_label);

        // Compile body
        self.compile_statements(&stmt.statements);
        self.vm.write_goto(&exp_label);

        self.vm.write_label(&end_label);
    }

    fn compile_do(&mut self, stmt: &DoStatement) {
        self.compile_subroutine_call(&stmt.call);
        // Discard return value
        self.vm.write_pop("temp", 0);
    }

    fn compile_return(&mut self, stmt: &ReturnStatement) {
        if let Some(expr) = &stmt.value {
            self.compile_expression(expr);
        } else {
            // Void return - push 0
            self.vm.write_push("constant", 0);
        }
        self.vm.write_return();
    }

    // ========================================================================
    // Expression Compilation
    // ========================================================================

    #[inline]
    fn compile_expression(&mut self, expr: &Expression) {
        self.compile_term(&expr.term);

        for (op, term) in &expr.ops {
            self.compile_term(term);
            self.compile_binary_op(*op);
        }
    }

    #[inline]
    fn compile_term(&mut self, term: &Term) {
        match term {
            Term::IntegerConstant(value, _) => {
                self.vm.write_push("constant", *value);
            }

            Term::StringConstant(s, _) => {
                self.compile_string_constant(s);
            }

            Term::KeywordConstant(kw, _) => {
                self.compile_keyword_constant(*kw);
            }

            Term::VarName(name, span) => match self.symbols.lookup(name) {
                Some(symbol) => {
                    self.vm.write_push(symbol.segment(), symbol.index);
                }
                None => {
                    self.error(CompileError::undefined_variable(name, span.clone()));
                }
            },

            Term::ArrayAccess(name, index_expr, span) => {
                match self.symbols.lookup(name) {
                    Some(symbol) => {
                        // Push base address
                        self.vm.write_push(symbol.segment(), symbol.index);
                        // Compile and add index
                        self.compile_expression(index_expr);
                        self.vm.write_arithmetic("add");
                        // Access via THAT
                        self.vm.write_pop("pointer", 1);
                        self.vm.write_push("that", 0);
                    }
                    None => {
                        self.error(CompileError::undefined_variable(name, span.clone()));
                    }
                }
            }

            Term::SubroutineCall(call) => {
                self.compile_subroutine_call(call);
            }

            Term::Parenthesized(expr, _) => {
                self.compile_expression(expr);
            }

            Term::UnaryOp(op, inner, _) => {
                self.compile_term(inner);
                match op {
                    UnaryOp::Neg => self.vm.write_arithmetic("neg"),
                    UnaryOp::Not => self.vm.write_arithmetic("not"),
                }
            }
        }
    }

    #[inline]
    fn compile_string_constant(&mut self, s: &str) {
        // Create string object
        let len = s.len() as u16;
        self.vm.write_push("constant", len);
        self.vm.write_call("String.new", 1);

        // Append each character
        for ch in s.chars() {
            self.vm.write_push("constant", ch as u16);
            self.vm.write_call("String.appendChar", 2);
        }
    }

    #[inline]
    fn compile_keyword_constant(&mut self, kw: KeywordConstant) {
        match kw {
            KeywordConstant::True => {
                // true = -1 = ~0
                self.vm.write_push("constant", 0);
                self.vm.write_arithmetic("not");
            }
            KeywordConstant::False | KeywordConstant::Null => {
                self.vm.write_push("constant", 0);
            }
            KeywordConstant::This => {
                self.vm.write_push("pointer", 0);
            }
        }
    }

    #[inline]
    fn compile_binary_op(&mut self, op: BinaryOp) {
        match op {
            BinaryOp::Add => self.vm.write_arithmetic("add"),
            BinaryOp::Sub => self.vm.write_arithmetic("sub"),
            BinaryOp::And => self.vm.write_arithmetic("and"),
            BinaryOp::Or => self.vm.write_arithmetic("or"),
            BinaryOp::Lt => self.vm.write_arithmetic("lt"),
            BinaryOp::Gt => self.vm.write_arithmetic("gt"),
            BinaryOp::Eq => self.vm.write_arithmetic("eq"),
            BinaryOp::Mul => self.vm.write_call("Math.multiply", 2),
            BinaryOp::Div => self.vm.write_call("Math.divide", 2),
        }
    }

    fn compile_subroutine_call(&mut self, call: &SubroutineCall) {
        // Determine class name for the call and push receiver if method
        // We need to clone the class name to avoid borrow issues
        let (class_name_owned, num_args) = if let Some(receiver) = &call.receiver {
            // Either ClassName.function() or varName.method()
            if let Some(symbol) = self.symbols.lookup(receiver) {
                // Method call on object variable - push receiver
                self.vm.write_push(symbol.segment(), symbol.index);
                let cn = match &symbol.symbol_type {
                    Type::ClassName(name) => name.clone(),
                    _ => receiver.clone(), // Fallback
                };
                (cn, call.arguments.len() as u16 + 1)
            } else {
                // Function or constructor call: ClassName.func()
                (receiver.clone(), call.arguments.len() as u16)
            }
        } else {
            // Method call on `this`: method()
            self.vm.write_push("pointer", 0);
            (self.class_name.clone(), call.arguments.len() as u16 + 1)
        };

        // Compile arguments
        for arg in &call.arguments {
            self.compile_expression(arg);
        }

        // Write call command (zero-allocation for the write itself)
        {
            let buf = self.vm.output_mut();
            buf.push_str("call ");
            buf.push_str(&class_name_owned);
            buf.push('.');
            buf.push_str(&call.name);
            buf.push(' ');
            write_u16(num_args, buf);
            buf.push('\n');
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
