//! Integration tests for the register operator surface.

use syncreg::common::{BinOp, CmpOp, RegValue};
use syncreg::sched::Kernel;

/// Tests that every compound assignment equals a write of the computed
/// value, committed one cycle later.
#[test]
fn test_compound_assignment_equivalence() {
    let operands = [0i32, 1, 3, -7, 31, i32::MAX];
    let starts = [0i32, 5, -100, i32::MIN, 0x1234_5678];

    for op in BinOp::ALL {
        for &start in &starts {
            for &x in &operands {
                let mut kernel = Kernel::new(1);
                let a = kernel.sync_reg("A", start);
                let b = kernel.sync_reg("B", start);

                a.borrow_mut().apply(op, x);
                let expected = b.borrow().read().apply(op, x);
                b.borrow_mut().write(expected);

                assert_eq!(a.borrow().read(), start, "{} applied early", op);
                kernel.tick().unwrap();
                assert_eq!(
                    a.borrow().read(),
                    b.borrow().read(),
                    "{} {} {}",
                    start,
                    op,
                    x
                );
            }
        }
    }
}

/// Tests the `std::ops` assignment operators against raw values.
#[test]
fn test_assign_operators_raw() {
    let mut kernel = Kernel::new(1);
    let r = kernel.sync_reg("R", 12u32);

    *r.borrow_mut() += 4;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 16);

    *r.borrow_mut() -= 1;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 15);

    *r.borrow_mut() *= 3;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 45);

    *r.borrow_mut() /= 4;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 11);

    *r.borrow_mut() %= 4;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 3);

    *r.borrow_mut() <<= 4;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 0x30);

    *r.borrow_mut() >>= 1;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 0x18);

    *r.borrow_mut() |= 0x101;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 0x119);

    *r.borrow_mut() &= 0x0F0;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 0x010);

    *r.borrow_mut() ^= 0x011;
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 0x001);
}

/// Tests that chained compound assignments in one cycle all start from the
/// committed value, so only the last one survives.
#[test]
fn test_chained_assignments_are_synchronous() {
    let mut kernel = Kernel::new(1);
    let r = kernel.sync_reg("R", 10i64);

    {
        let mut r = r.borrow_mut();
        *r += 1;
        *r += 1;
        *r *= 2;
    }
    kernel.tick().unwrap();
    assert_eq!(r.borrow().read(), 20);
}

/// Tests assignment operators with another register of the same type.
#[test]
fn test_assign_operators_register() {
    let mut kernel = Kernel::new(1);
    let a = kernel.sync_reg("A", 6u16);
    let b = kernel.sync_reg("B", 4u16);

    *a.borrow_mut() += &*b.borrow();
    kernel.tick().unwrap();
    assert_eq!(a.borrow().read(), 10);

    *a.borrow_mut() ^= &*b.borrow();
    kernel.tick().unwrap();
    assert_eq!(a.borrow().read(), 14);
}

/// Tests cross-type operands, which are converted with value-cast semantics.
#[test]
fn test_cross_type_operands() {
    let mut kernel = Kernel::new(1);
    let narrow = kernel.sync_reg("N", 0xF0u8);
    let wide = kernel.sync_reg("W", 0x1_0010u32);

    narrow.borrow_mut().apply_reg(BinOp::Add, &*wide.borrow());
    kernel.tick().unwrap();
    assert_eq!(narrow.borrow().read(), 0x00);

    wide.borrow_mut().apply_cast(BinOp::Sub, -1i8);
    kernel.tick().unwrap();
    assert_eq!(wide.borrow().read(), 0x1_0011);

    narrow.borrow_mut().assign_from(&*wide.borrow());
    kernel.tick().unwrap();
    assert_eq!(narrow.borrow().read(), 0x11);

    wide.borrow_mut().assign_cast(-2i64);
    kernel.tick().unwrap();
    assert_eq!(wide.borrow().read(), 0xFFFF_FFFE);
}

/// Tests division and remainder by zero through the operator surface.
#[test]
fn test_division_by_zero_is_defined() {
    let mut kernel = Kernel::new(1);
    let q = kernel.sync_reg("Q", 9i32);
    let r = kernel.sync_reg("R", 9u8);

    *q.borrow_mut() /= 0;
    *r.borrow_mut() %= 0;
    kernel.tick().unwrap();
    assert_eq!(q.borrow().read(), -1);
    assert_eq!(r.borrow().read(), 9);
}

/// Tests comparisons against raw values and other registers.
#[test]
fn test_comparisons() {
    let mut kernel = Kernel::new(1);
    let a = kernel.sync_reg("A", 5i32);
    let b = kernel.sync_reg("B", 7i32);

    let a_ref = a.borrow();
    let b_ref = b.borrow();
    assert!(*a_ref == 5);
    assert!(*a_ref != 6);
    assert!(*a_ref < 6);
    assert!(*a_ref <= 5);
    assert!(*a_ref > 4);
    assert!(*a_ref >= 5);

    assert!(*a_ref < *b_ref);
    assert!(*a_ref != *b_ref);
    assert!(*b_ref >= *a_ref);
    assert!(a_ref.compare(CmpOp::Le, 5));
}

/// Tests that comparisons read the committed value, not the pending one.
#[test]
fn test_comparisons_use_committed_value() {
    let mut kernel = Kernel::new(1);
    let a = kernel.sync_reg("A", 1u32);

    a.borrow_mut().write(2);
    assert!(*a.borrow() == 1);
    assert!(!a.borrow().compare(CmpOp::Eq, 2));
    kernel.tick().unwrap();
    assert!(*a.borrow() == 2);
}

/// Tests cross-type comparisons.
#[test]
fn test_cross_type_comparisons() {
    let mut kernel = Kernel::new(1);
    let a = kernel.sync_reg("A", 0xFFu8);
    let b = kernel.sync_reg("B", -1i32);

    // -1i32 narrows to 0xFF.
    assert!(a.borrow().compare_reg(CmpOp::Eq, &*b.borrow()));
    assert!(a.borrow().compare_cast(CmpOp::Gt, 0x1FEu16));
    for op in CmpOp::ALL {
        assert_eq!(
            a.borrow().compare_cast(op, 0x100u32),
            op.eval(0xFFu8, 0u8),
            "{:?}",
            op
        );
    }
}
