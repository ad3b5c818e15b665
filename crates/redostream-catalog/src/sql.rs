//! Catalog Query Text
//!
//! The literal SQL issued against the source database's fixed views. The
//! text is part of the operational contract: implementations of
//! [`crate::CatalogClient`] are expected to run these statements verbatim
//! (bind markers included) so that the typed rows in [`crate::types`] line
//! up column for column.

/// Bootstrap: logging mode, supplemental logging, platform endianness,
/// current SCN, current incarnation, version banner, and database name in a
/// single round trip.
pub const BOOTSTRAP: &str = "SELECT D.LOG_MODE, D.SUPPLEMENTAL_LOG_DATA_MIN, TP.ENDIAN_FORMAT, \
     D.CURRENT_SCN, DI.RESETLOGS_ID, VER.BANNER, \
     SYS_CONTEXT('USERENV','DB_NAME') AS DB_NAME \
     FROM SYS.V_$DATABASE D \
     JOIN SYS.V_$TRANSPORTABLE_PLATFORM TP ON TP.PLATFORM_NAME = D.PLATFORM_NAME \
     JOIN SYS.V_$VERSION VER ON VER.BANNER LIKE '%Oracle Database%' \
     JOIN SYS.V_$DATABASE_INCARNATION DI ON DI.STATUS = 'CURRENT'";

/// Container id of the session; only meaningful past the 11g family.
pub const CONTAINER_ID: &str =
    "SELECT SYS_CONTEXT('USERENV','CON_ID') CON_ID FROM DUAL";

/// Sequence of the online log currently being written.
pub const CURRENT_ONLINE_SEQUENCE: &str =
    "SELECT SEQUENCE# FROM SYS.V_$LOG WHERE STATUS = 'CURRENT'";

/// Online log members, ordered so the first readable member per group wins.
pub const ONLINE_LOGFILES: &str = "SELECT LF.GROUP#, LF.MEMBER FROM SYS.V_$LOGFILE LF \
     ORDER BY LF.GROUP# ASC, LF.IS_RECOVERY_DEST_FILE DESC, LF.MEMBER ASC";

/// Archived logs at or past a sequence floor within one incarnation,
/// ordered by sequence then destination.
pub const ARCHIVED_LOGS: &str = "SELECT NAME, SEQUENCE#, FIRST_CHANGE#, FIRST_TIME, NEXT_CHANGE#, NEXT_TIME \
     FROM SYS.V_$ARCHIVED_LOG \
     WHERE SEQUENCE# >= :i AND RESETLOGS_ID = :i AND NAME IS NOT NULL \
     ORDER BY SEQUENCE#, DEST_ID";

/// Tables matching an owner.name mask, with the dependency flag decoded
/// from the table flags.
pub const TABLES_BY_MASK: &str = "SELECT tab.DATAOBJ# as objd, tab.OBJ# as objn, tab.CLUCOLS as clucols, \
     usr.USERNAME AS owner, obj.NAME AS objectName, \
     decode(bitand(tab.FLAGS, 8388608), 8388608, 1, 0) as dependencies \
     FROM SYS.TAB$ tab, SYS.OBJ$ obj, ALL_USERS usr \
     WHERE tab.OBJ# = obj.OBJ# \
     AND obj.OWNER# = usr.USER_ID \
     AND usr.USERNAME || '.' || obj.NAME LIKE :i";

/// Columns of one table with primary-key membership counts, ordered by
/// segment column number.
pub const COLUMNS_BY_OBJN: &str = "SELECT C.COL#, C.SEGCOL#, C.NAME, C.TYPE#, C.LENGTH, C.PRECISION#, C.SCALE, \
     C.NULL$, (SELECT COUNT(*) FROM SYS.CCOL$ L JOIN SYS.CDEF$ D on D.con# = L.con# \
     AND D.type# = 2 WHERE L.intcol# = C.intcol# and L.obj# = C.obj#) AS NUMPK \
     FROM SYS.COL$ C WHERE C.OBJ# = :i ORDER BY C.SEGCOL#";
