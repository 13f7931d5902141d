//! Operator surface of [`SyncReg`].
//!
//! Compound assignments forward to [`SyncReg::apply`] and comparisons to
//! [`SyncReg::compare`], so `r += x` is exactly `r.write(r.read() + x)` and
//! is only visible after the next commit. Operands may be a raw value of the
//! register's type or another register of the same type. Mixed value types
//! go through `apply_cast` / `apply_reg` and friends.

use std::cmp::Ordering;
use std::ops::{
    AddAssign, BitAndAssign, BitOrAssign, BitXorAssign, DivAssign, MulAssign, RemAssign,
    ShlAssign, ShrAssign, SubAssign,
};

use crate::common::value::{BinOp, CmpOp, RegValue};
use crate::storage::SyncReg;

macro_rules! impl_assign_op {
    ($($tr:ident, $method:ident, $op:expr;)*) => {$(
        impl<T: RegValue> $tr<T> for SyncReg<T> {
            fn $method(&mut self, rhs: T) {
                self.apply($op, rhs);
            }
        }

        impl<T: RegValue> $tr<&SyncReg<T>> for SyncReg<T> {
            fn $method(&mut self, rhs: &SyncReg<T>) {
                self.apply($op, rhs.read());
            }
        }
    )*};
}

impl_assign_op! {
    AddAssign, add_assign, BinOp::Add;
    SubAssign, sub_assign, BinOp::Sub;
    MulAssign, mul_assign, BinOp::Mul;
    DivAssign, div_assign, BinOp::Div;
    RemAssign, rem_assign, BinOp::Rem;
    ShlAssign, shl_assign, BinOp::Shl;
    ShrAssign, shr_assign, BinOp::Shr;
    BitAndAssign, bitand_assign, BinOp::And;
    BitOrAssign, bitor_assign, BinOp::Or;
    BitXorAssign, bitxor_assign, BinOp::Xor;
}

impl<T: RegValue> PartialEq<T> for SyncReg<T> {
    fn eq(&self, other: &T) -> bool {
        self.compare(CmpOp::Eq, *other)
    }
}

impl<T: RegValue> PartialOrd<T> for SyncReg<T> {
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        self.read().partial_cmp(other)
    }

    fn lt(&self, other: &T) -> bool {
        self.compare(CmpOp::Lt, *other)
    }

    fn le(&self, other: &T) -> bool {
        self.compare(CmpOp::Le, *other)
    }

    fn gt(&self, other: &T) -> bool {
        self.compare(CmpOp::Gt, *other)
    }

    fn ge(&self, other: &T) -> bool {
        self.compare(CmpOp::Ge, *other)
    }
}

impl<T: RegValue> PartialEq for SyncReg<T> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(CmpOp::Eq, other.read())
    }
}

impl<T: RegValue> PartialOrd for SyncReg<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.read().partial_cmp(&other.read())
    }

    fn lt(&self, other: &Self) -> bool {
        self.compare(CmpOp::Lt, other.read())
    }

    fn le(&self, other: &Self) -> bool {
        self.compare(CmpOp::Le, other.read())
    }

    fn gt(&self, other: &Self) -> bool {
        self.compare(CmpOp::Gt, other.read())
    }

    fn ge(&self, other: &Self) -> bool {
        self.compare(CmpOp::Ge, other.read())
    }
}

// Conversion to the value type reads the committed value.
macro_rules! impl_from_reg {
    ($($t:ty),*) => {$(
        impl From<&SyncReg<$t>> for $t {
            fn from(reg: &SyncReg<$t>) -> Self {
                reg.read()
            }
        }
    )*};
}

impl_from_reg!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
