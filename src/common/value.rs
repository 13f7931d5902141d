//! Register Value Types.
//!
//! This module defines what may live inside a synchronous register and the
//! operator tags that drive the register's assignment and comparison surface.
//! Instead of one overload per operator and operand type, every compound
//! assignment is a [`BinOp`] applied through [`RegValue::apply`] and every
//! comparison is a [`CmpOp`] evaluated through [`CmpOp::eval`].
//!
//! All arithmetic is total:
//! * Results wrap at the width of the value type.
//! * Shift amounts are taken modulo the bit width.
//! * Division by zero yields all ones and remainder by zero yields the dividend.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Binary operators available as compound assignments on a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// Wrapping addition (`+=`).
    Add,
    /// Wrapping subtraction (`-=`).
    Sub,
    /// Wrapping multiplication (`*=`).
    Mul,
    /// Division (`/=`), all ones on a zero divisor.
    Div,
    /// Remainder (`%=`), the dividend on a zero divisor.
    Rem,
    /// Left shift (`<<=`).
    Shl,
    /// Right shift (`>>=`), arithmetic for signed types.
    Shr,
    /// Bitwise AND (`&=`).
    And,
    /// Bitwise OR (`|=`).
    Or,
    /// Bitwise XOR (`^=`).
    Xor,
}

impl BinOp {
    /// Every operator, in declaration order.
    pub const ALL: [BinOp; 10] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Rem,
        BinOp::Shl,
        BinOp::Shr,
        BinOp::And,
        BinOp::Or,
        BinOp::Xor,
    ];

    /// Returns the operator's source symbol, without the `=`.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.symbol())
    }
}

/// Comparison operators available on a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// Every comparison, in declaration order.
    pub const ALL: [CmpOp; 6] = [
        CmpOp::Eq,
        CmpOp::Ne,
        CmpOp::Lt,
        CmpOp::Le,
        CmpOp::Gt,
        CmpOp::Ge,
    ];

    /// Evaluates `a <op> b`.
    pub fn eval<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        }
    }
}

/// A fixed-width value that can be held by a synchronous register.
///
/// The serde bounds let change-log entries carrying the value be persisted
/// and reloaded.
pub trait RegValue:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + 'static
{
    /// Width of the value in bits.
    const BITS: u32;

    /// Computes `self <op> rhs`.
    fn apply(self, op: BinOp, rhs: Self) -> Self;
}

/// Value conversion between register value types, with `as` semantics
/// (truncation on narrowing, sign or zero extension on widening).
pub trait CastFrom<U> {
    fn cast_from(value: U) -> Self;
}

macro_rules! impl_reg_value {
    ($($t:ty),*) => {$(
        impl RegValue for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn apply(self, op: BinOp, rhs: Self) -> Self {
                match op {
                    BinOp::Add => self.wrapping_add(rhs),
                    BinOp::Sub => self.wrapping_sub(rhs),
                    BinOp::Mul => self.wrapping_mul(rhs),
                    BinOp::Div => {
                        if rhs == 0 {
                            !0
                        } else {
                            self.wrapping_div(rhs)
                        }
                    }
                    BinOp::Rem => {
                        if rhs == 0 {
                            self
                        } else {
                            self.wrapping_rem(rhs)
                        }
                    }
                    BinOp::Shl => self.wrapping_shl(rhs as u32),
                    BinOp::Shr => self.wrapping_shr(rhs as u32),
                    BinOp::And => self & rhs,
                    BinOp::Or => self | rhs,
                    BinOp::Xor => self ^ rhs,
                }
            }
        }
    )*};
}

impl_reg_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! impl_cast_from {
    ($t:ty; $($u:ty),*) => {$(
        impl CastFrom<$u> for $t {
            #[inline]
            fn cast_from(value: $u) -> Self {
                value as $t
            }
        }
    )*};
}

macro_rules! impl_cast_all {
    ($($t:ty),*) => {$(
        impl_cast_from!($t; u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
    )*};
}

impl_cast_all!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
