use std::collections::HashSet;

use diagnostic::{DiagnosticCode, Position, ReportSink};
use scanner::token::types::TokenKind;

use super::Parser;
use crate::ast::{Accessor, Class, Constructor, Field, File, Function, Parameter, Reference, TypeRef, Usage};

impl Parser {
  pub(crate) fn parse_file(&mut self, sink: &mut ReportSink) -> File {
    let pkg = if self.match_kind(TokenKind::Mod) {
      let (segments, _) = self.parse_dotted_name(sink);
      Some(segments)
    } else {
      None
    };

    let mut usages = Vec::new();
    while self.check(TokenKind::Use) {
      self.advance();
      usages.extend(self.parse_usage_ref(Vec::new(), sink));
      self.match_kind(TokenKind::SemiColon);
    }

    let clazz = self.parse_class(pkg, usages, sink);

    File {
      path: self.path.clone(),
      clazz,
    }
  }

  /// `UsageRef = Name { "::" Name } [ "::" "{" UsageRef { "," UsageRef } "}" ] [ "as" Name ]`
  fn parse_usage_ref(&mut self, prefix: Vec<String>, sink: &mut ReportSink) -> Vec<Usage> {
    let (name, pos) = self.parse_simple_name(sink);
    let mut path = prefix;
    path.push(name);

    if self.match_kind(TokenKind::ColonColon) {
      if self.check(TokenKind::LeftBrace) {
        self.advance();
        let mut usages = Vec::new();
        loop {
          usages.extend(self.parse_usage_ref(path.clone(), sink));
          if !self.match_kind(TokenKind::Comma) {
            break;
          }
        }
        self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);
        return usages;
      }
      return self.parse_usage_ref(path, sink);
    }

    let alias = if self.match_kind(TokenKind::As) {
      Some(self.parse_simple_name(sink).0)
    } else {
      None
    };

    vec![Usage {
      reference: Reference::new(path, Some(pos)),
      alias,
      pos: Some(pos),
    }]
  }

  /// `Class = [Accessor] "class" Name [ "{" {FieldBlock} "}" ] [Impl]`
  fn parse_class(&mut self, pkg: Option<Vec<String>>, usages: Vec<Usage>, sink: &mut ReportSink) -> Class {
    let start_pos = self.current_pos();
    let (accessor, explicit_pub) = self.parse_accessor();
    if explicit_pub && self.options.warn_redundant_pub {
      self.warn(DiagnosticCode::RedundantPublicAccessor, "redundant explicit `pub`", start_pos, sink);
    }

    self.expect(TokenKind::Class, DiagnosticCode::UnexpectedToken, "'class'", sink);
    let (name, _) = self.parse_simple_name(sink);

    let mut class = Class {
      pkg,
      usages,
      accessor,
      name,
      fields: Vec::new(),
      constructors: Vec::new(),
      functions: Vec::new(),
      pos: Some(start_pos),
    };

    if self.match_kind(TokenKind::LeftBrace) {
      self.parse_field_group(&mut class, false, sink);
      self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);
    }

    if self.match_kind(TokenKind::Impl) {
      self.parse_simple_name(sink);
      self.expect(TokenKind::LeftBrace, DiagnosticCode::MissingClosingBrace, "'{'", sink);
      self.parse_member_block(&mut class, false, sink);
      self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);
    }

    class
  }

  /// Parses repeated `[Accessor] [mut] ":" { Name ":" Type }` field groups,
  /// plus `comp { ... }` nested groups (which must not nest further).
  fn parse_field_group(&mut self, class: &mut Class, companion: bool, sink: &mut ReportSink) {
    let mut seen_headers: HashSet<(Accessor, bool)> = HashSet::new();

    while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
      if self.check(TokenKind::Comp) {
        let pos = self.current_pos();
        self.advance();
        if companion {
          self.error(DiagnosticCode::NestedCompanionBlock, "companion blocks must not nest", pos, sink);
        }
        self.expect(TokenKind::LeftBrace, DiagnosticCode::MissingClosingBrace, "'{'", sink);
        self.parse_field_group(class, true, sink);
        self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);
        continue;
      }

      let header_pos = self.current_pos();
      let (accessor, explicit_pub) = self.parse_accessor();
      let mutable = self.match_kind(TokenKind::Mut);

      if !self.check(TokenKind::Colon) {
        let found = self.peek().clone();
        self.error(
          DiagnosticCode::UnexpectedToken,
          format!("expected ':' to start a field block, found {:?}", found.kind),
          found.pos,
          sink,
        );
        self.advance();
        continue;
      }
      self.advance();

      if explicit_pub && self.options.warn_redundant_pub {
        self.warn(DiagnosticCode::RedundantPublicAccessor, "redundant explicit `pub`", header_pos, sink);
      }
      if !seen_headers.insert((accessor, mutable)) {
        self.error(
          DiagnosticCode::DuplicateAccessBlock,
          "this (access, mut) combination is already declared in this block; merge the field lists",
          header_pos,
          sink,
        );
      }

      while self.check(TokenKind::Identifier) {
        let name_pos = self.current_pos();
        let (name, _) = self.parse_simple_name(sink);
        self.expect(TokenKind::Colon, DiagnosticCode::UnexpectedToken, "':'", sink);
        let type_ref = self.parse_type_ref(sink);

        if class.fields.iter().any(|f| f.name == name) {
          self.error(DiagnosticCode::DuplicateField, format!("duplicate field `{name}`"), name_pos, sink);
        }

        class.fields.push(Field {
          owner: None,
          accessor,
          mutable,
          companion,
          name,
          type_ref,
          ty: None,
          pos: Some(name_pos),
        });
      }
    }
  }

  /// Parses repeated modifier-prefixed constructor/function declarations
  /// inside an `impl` brace group, plus `comp { ... }` nested groups.
  fn parse_member_block(&mut self, class: &mut Class, companion: bool, sink: &mut ReportSink) {
    while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
      if self.check(TokenKind::Comp) {
        let pos = self.current_pos();
        self.advance();
        if companion {
          self.error(DiagnosticCode::NestedCompanionBlock, "companion blocks must not nest", pos, sink);
        }
        self.expect(TokenKind::LeftBrace, DiagnosticCode::MissingClosingBrace, "'{'", sink);
        self.parse_member_block(class, true, sink);
        self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);
        continue;
      }

      let mod_pos = self.current_pos();
      let (accessor, explicit_pub) = self.parse_accessor();
      let mutable = self.match_kind(TokenKind::Mut);
      if self.is_accessor_token(self.peek_kind()) {
        self.error(
          DiagnosticCode::InvalidModifierOrder,
          "accessor modifier must precede `mut`",
          self.current_pos(),
          sink,
        );
        self.advance();
      }
      if explicit_pub && self.options.warn_redundant_pub {
        self.warn(DiagnosticCode::RedundantPublicAccessor, "redundant explicit `pub`", mod_pos, sink);
      }

      if self.check(TokenKind::New) {
        self.parse_constructor(class, companion, mutable, accessor, mod_pos, sink);
      } else if self.check(TokenKind::Fn) {
        self.parse_function(class, companion, mutable, accessor, mod_pos, sink);
      } else {
        let found = self.peek().clone();
        self.error(
          DiagnosticCode::UnexpectedToken,
          format!("expected 'new' or 'fn', found {:?}", found.kind),
          found.pos,
          sink,
        );
        self.advance();
      }
    }
  }

  fn parse_constructor(
    &mut self,
    class: &mut Class,
    companion: bool,
    mutable: bool,
    accessor: Accessor,
    pos: Position,
    sink: &mut ReportSink,
  ) {
    self.advance(); // 'new'
    if companion {
      self.error(DiagnosticCode::ConstructorInCompanion, "constructors are not allowed in a companion block", pos, sink);
    }
    if mutable {
      self.error(DiagnosticCode::MutableConstructor, "constructors cannot be marked `mut`", pos, sink);
    }

    let params = self.parse_parameters(sink);
    self.expect(TokenKind::LeftBrace, DiagnosticCode::MissingClosingBrace, "'{'", sink);
    let mut statements = self.parse_statements_until_brace(sink);
    self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);

    let super_args = self.take_super_args(&mut statements);

    if class
      .constructors
      .iter()
      .any(|c| c.params.len() == params.len() && c.params.iter().zip(&params).all(|(a, b)| a.type_ref == b.type_ref))
    {
      self.error(DiagnosticCode::DuplicateConstructor, "duplicate constructor signature", pos, sink);
    }

    class.constructors.push(Constructor {
      owner: None,
      parent_ref: None,
      accessor,
      params,
      super_args,
      statements,
      pos: Some(pos),
    });
  }

  fn parse_function(
    &mut self,
    class: &mut Class,
    companion: bool,
    mutable: bool,
    accessor: Accessor,
    pos: Position,
    sink: &mut ReportSink,
  ) {
    self.advance(); // 'fn'
    let (name, _) = self.parse_simple_name(sink);
    let params = self.parse_parameters(sink);

    let return_type_ref = if self.match_kind(TokenKind::Colon) {
      Some(self.parse_type_ref(sink))
    } else {
      None
    };

    self.expect(TokenKind::LeftBrace, DiagnosticCode::MissingClosingBrace, "'{'", sink);
    let statements = self.parse_statements_until_brace(sink);
    self.expect(TokenKind::RightBrace, DiagnosticCode::MissingClosingBrace, "'}'", sink);

    if class.functions.iter().any(|f| {
      f.name == name && f.params.len() == params.len() && f.params.iter().zip(&params).all(|(a, b)| a.type_ref == b.type_ref)
    }) {
      self.error(DiagnosticCode::DuplicateFunction, format!("duplicate function signature `{name}`"), pos, sink);
    }

    class.functions.push(Function {
      owner: None,
      accessor,
      mutable,
      companion,
      name,
      params,
      return_type_ref,
      return_type: None,
      statements,
      pos: Some(pos),
    });
  }

  fn parse_parameters(&mut self, sink: &mut ReportSink) -> Vec<Parameter> {
    self.expect(TokenKind::LeftParen, DiagnosticCode::MissingClosingParen, "'('", sink);
    let mut params = Vec::new();
    let mut seen = HashSet::new();

    while !self.check(TokenKind::RightParen) && !self.is_at_end() {
      let pos = self.current_pos();
      let mutable = self.match_kind(TokenKind::Mut);
      let (name, _) = self.parse_simple_name(sink);
      self.expect(TokenKind::Colon, DiagnosticCode::UnexpectedToken, "':'", sink);
      let type_ref = self.parse_type_ref(sink);

      if !seen.insert(name.clone()) {
        self.error(DiagnosticCode::DuplicateParameterName, format!("duplicate parameter `{name}`"), pos, sink);
      }

      params.push(Parameter {
        mutable,
        name,
        type_ref,
        ty: None,
        pos: Some(pos),
      });

      if !self.match_kind(TokenKind::Comma) {
        break;
      }
    }

    self.expect(TokenKind::RightParen, DiagnosticCode::MissingClosingParen, "')'", sink);
    params
  }

  fn is_accessor_token(&self, kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Pub | TokenKind::Prot | TokenKind::Intl | TokenKind::Priv)
  }

  fn parse_accessor(&mut self) -> (Accessor, bool) {
    match self.peek_kind() {
      TokenKind::Pub => {
        self.advance();
        (Accessor::Pub, true)
      },
      TokenKind::Prot => {
        self.advance();
        (Accessor::Prot, false)
      },
      TokenKind::Intl => {
        self.advance();
        (Accessor::Intl, false)
      },
      TokenKind::Priv => {
        self.advance();
        (Accessor::Priv, false)
      },
      _ => (Accessor::default(), false),
    }
  }

  pub(crate) fn parse_simple_name(&mut self, sink: &mut ReportSink) -> (String, Position) {
    let pos = self.current_pos();
    if self.check(TokenKind::Identifier) {
      let tok = self.advance();
      (tok.lexeme, pos)
    } else {
      let tok = self.expect(TokenKind::Identifier, DiagnosticCode::UnexpectedToken, "an identifier", sink);
      (tok.lexeme, pos)
    }
  }

  pub(crate) fn parse_dotted_name(&mut self, sink: &mut ReportSink) -> (Vec<String>, Position) {
    let (first, start) = self.parse_simple_name(sink);
    let mut segments = vec![first];
    let mut end = start;
    while self.check(TokenKind::Dot) {
      self.advance();
      let (seg, pos) = self.parse_simple_name(sink);
      segments.push(seg);
      end = pos;
    }
    (segments, start.extend(&end))
  }

  pub(crate) fn parse_type_ref(&mut self, sink: &mut ReportSink) -> TypeRef {
    let (segments, pos) = self.parse_dotted_name(sink);
    let mut type_ref = TypeRef::Named(Reference::new(segments, Some(pos)));
    while self.check(TokenKind::LeftBracket) && self.peek_at(1) == TokenKind::RightBracket {
      self.advance();
      self.advance();
      type_ref = TypeRef::Array(Box::new(type_ref));
    }
    type_ref
  }
}
